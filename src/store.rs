//! The vehicle-data collaborator consumed by the pipeline.
//!
//! The pipeline never owns vehicle data; it reads two projections of it
//! through [`VehicleStore`]: one car by plate, and that car's damage history.
//! The trait is deliberately synchronous — real backings are blocking I/O
//! (a database session, a file) — and the orchestrator moves calls onto the
//! blocking thread pool, keeping async plumbing out of store implementations.
//!
//! A store handle is passed explicitly into every run. There is no
//! process-wide shared instance, so two concurrent requests can never
//! observe each other through this crate.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A vehicle as known to the data collaborator. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Identifying key; matched exactly against the canonical plate.
    pub license_plate: String,
    pub model: String,
    pub color: String,
    pub vin_number: String,
    pub brand: String,
}

/// One recorded damage, associated with exactly one car by plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub damage_type: String,
    pub damaged_part: String,
    pub date: String,
}

/// Read-only access to vehicle records, keyed by license plate.
///
/// Implementations must be `Send + Sync`: the orchestrator calls them from
/// the blocking thread pool. Lookups for one run must not interfere with
/// lookups for another; beyond that no synchronisation is required.
pub trait VehicleStore: Send + Sync {
    /// Look up the car with the given plate, if any.
    fn find_car_by_plate(&self, plate: &str) -> Result<Option<CarRecord>, ReportError>;

    /// All damage records for the given plate, in storage order.
    ///
    /// Returns an empty vector — never an error — when the car has no
    /// recorded damage.
    fn list_damages_by_plate(&self, plate: &str) -> Result<Vec<DamageRecord>, ReportError>;
}

/// In-memory store, for tests and embedding callers that already hold the
/// records.
#[derive(Debug, Default)]
pub struct InMemoryVehicleStore {
    cars: HashMap<String, CarRecord>,
    damages: HashMap<String, Vec<DamageRecord>>,
}

impl InMemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a car. Replaces any existing car with the same plate.
    pub fn insert_car(&mut self, car: CarRecord) {
        self.cars.insert(car.license_plate.clone(), car);
    }

    /// Append a damage record for the given plate.
    ///
    /// Insertion order is preserved and is the order reports render in.
    pub fn insert_damage(&mut self, plate: impl Into<String>, damage: DamageRecord) {
        self.damages.entry(plate.into()).or_default().push(damage);
    }
}

impl VehicleStore for InMemoryVehicleStore {
    fn find_car_by_plate(&self, plate: &str) -> Result<Option<CarRecord>, ReportError> {
        Ok(self.cars.get(plate).cloned())
    }

    fn list_damages_by_plate(&self, plate: &str) -> Result<Vec<DamageRecord>, ReportError> {
        Ok(self.damages.get(plate).cloned().unwrap_or_default())
    }
}

/// On-disk fleet file backing the CLI.
///
/// The whole fleet is loaded eagerly at startup; lookups are then pure
/// in-memory reads, so one `JsonVehicleStore` can serve many runs without
/// cross-run interference.
///
/// File format:
/// ```json
/// {
///   "cars": [ { "license_plate": "ABC123", "model": "...", ... } ],
///   "damages": { "ABC123": [ { "damage_type": "...", ... } ] }
/// }
/// ```
#[derive(Debug)]
pub struct JsonVehicleStore {
    inner: InMemoryVehicleStore,
}

#[derive(Deserialize)]
struct FleetFile {
    #[serde(default)]
    cars: Vec<CarRecord>,
    #[serde(default)]
    damages: HashMap<String, Vec<DamageRecord>>,
}

impl JsonVehicleStore {
    /// Load a fleet file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ReportError::StoreFailed {
            detail: format!("cannot read fleet file '{}': {}", path.display(), e),
        })?;
        let fleet: FleetFile =
            serde_json::from_str(&raw).map_err(|e| ReportError::StoreFailed {
                detail: format!("fleet file '{}' is not valid JSON: {}", path.display(), e),
            })?;

        let mut inner = InMemoryVehicleStore::new();
        for car in fleet.cars {
            inner.cars.insert(car.license_plate.clone(), car);
        }
        inner.damages = fleet.damages;
        Ok(Self { inner })
    }
}

impl VehicleStore for JsonVehicleStore {
    fn find_car_by_plate(&self, plate: &str) -> Result<Option<CarRecord>, ReportError> {
        self.inner.find_car_by_plate(plate)
    }

    fn list_damages_by_plate(&self, plate: &str) -> Result<Vec<DamageRecord>, ReportError> {
        self.inner.list_damages_by_plate(plate)
    }
}
