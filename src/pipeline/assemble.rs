//! Report assembly: resolve a canonical plate against the vehicle store.
//!
//! Two lookups, one snapshot. The car lookup decides whether the run
//! continues at all; the damage lookup can only shrink to empty, never fail
//! the run. The resulting [`ReportDocument`] is immutable from here on —
//! the renderer reads it, nothing writes it.

use crate::error::ReportError;
use crate::output::ReportDocument;
use crate::store::VehicleStore;
use tracing::debug;

/// Build the report document for a canonical plate.
///
/// Damage order is preserved exactly as the store returned it; reports
/// render history in storage order, not date order.
///
/// # Errors
/// [`ReportError::CarNotFound`] when the plate matches no vehicle;
/// [`ReportError::StoreFailed`] when the store itself fails.
pub fn assemble(store: &dyn VehicleStore, plate: &str) -> Result<ReportDocument, ReportError> {
    let car = store
        .find_car_by_plate(plate)?
        .ok_or_else(|| ReportError::CarNotFound {
            plate: plate.to_string(),
        })?;

    let damages = store.list_damages_by_plate(plate)?;
    debug!(
        "Assembled report for '{}': {} damage record(s)",
        plate,
        damages.len()
    );

    Ok(ReportDocument { car, damages })
}
