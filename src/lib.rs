//! # platereport
//!
//! Generate vehicle damage-report PDFs from license-plate photos.
//!
//! ## Why this crate?
//!
//! Turning a photographed plate into a damage report sounds like glue code
//! until the third party enters the picture: the recognition service is
//! slow, occasionally unreachable, and its OCR output is noisy — repeated
//! runs, stray separators, watermark junk. This crate owns exactly that
//! pipeline and nothing else: the CRUD layer around vehicle data stays
//! behind a small trait ([`VehicleStore`]) the caller implements.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image
//!  │
//!  ├─ 1. Recognize    base64 + Basic auth POST to the recognition service
//!  ├─ 2. Canonicalize minimal-period reduction of the OCR text
//!  ├─ 3. Resolve      car + damage history via the VehicleStore trait
//!  └─ 4. Render       fixed-layout single-page PDF, byte-deterministic
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platereport::{generate, InMemoryVehicleStore, ReportConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReportConfig::builder()
//!         .credentials("user", "secret")
//!         .build()?;
//!     let store = Arc::new(InMemoryVehicleStore::new());
//!     let image = std::fs::read("plate.jpg")?;
//!
//!     let report = generate(&image, store, &config).await?;
//!     std::fs::write(report.filename(), &report.pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `platereport` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! platereport = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ReportConfig, ReportConfigBuilder, DEFAULT_RECOGNITION_URL};
pub use error::ReportError;
pub use generate::{generate, generate_sync, generate_to_file};
pub use output::{ReportDocument, ReportResponse, RunStats, REPORT_FILENAME, REPORT_MEDIA_TYPE};
pub use pipeline::canonical::canonicalize;
pub use store::{CarRecord, DamageRecord, InMemoryVehicleStore, JsonVehicleStore, VehicleStore};
