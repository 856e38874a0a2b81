//! Report generation entry points: one image in, one PDF report out.
//!
//! A run walks a fixed sequence of states:
//!
//! ```text
//! Received ──▶ Recognized ──▶ Canonicalized ──▶ Resolved ──▶ Rendered
//! ```
//!
//! and terminates either at `Rendered` (an [`ReportResponse`]) or at the
//! first failing stage, surfaced as the matching [`ReportError`] variant.
//! No state is revisited and a run is never restarted mid-flight; a fresh
//! image submission always starts over from `Received`.
//!
//! The run is sequential by design — each stage needs the previous stage's
//! output — so the only concurrency concern is that many runs may execute
//! at once. Nothing here holds shared mutable state; the store handle is
//! passed in per run.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::output::{ReportResponse, RunStats};
use crate::pipeline::{assemble, canonical, recognize, render};
use crate::store::VehicleStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Generate a damage report PDF from a photographed license plate.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `image_bytes` — the uploaded image, passed to the recognition service
///   as-is
/// * `store` — the vehicle-data collaborator for this run
/// * `config` — endpoint, credentials, timeout and retry budget
///
/// # Errors
/// Each terminal failure state maps to one [`ReportError`] variant:
/// recognition rejection or unreachability, no plate detected, car not
/// found, or an internal render failure. See [`ReportError::status_code`]
/// for the outward mapping.
pub async fn generate(
    image_bytes: &[u8],
    store: Arc<dyn VehicleStore>,
    config: &ReportConfig,
) -> Result<ReportResponse, ReportError> {
    let total_start = Instant::now();
    info!("Starting report run ({} image bytes)", image_bytes.len());

    // ── Step 1: Recognize ────────────────────────────────────────────────
    let recognition_start = Instant::now();
    let recognition = recognize::submit(image_bytes, config).await?;
    let recognition_ms = recognition_start.elapsed().as_millis() as u64;
    info!("Recognized plate text in {}ms", recognition_ms);

    // ── Step 2: Canonicalize ─────────────────────────────────────────────
    let plate = canonical::canonicalize(&recognition.text).ok_or(ReportError::NoPlateDetected)?;
    info!("Canonical plate: {}", plate);

    // ── Step 3: Resolve car and damages ──────────────────────────────────
    // Stores are blocking I/O; keep them off the async worker threads.
    let lookup_start = Instant::now();
    let document = {
        let store = Arc::clone(&store);
        let plate = plate.clone();
        tokio::task::spawn_blocking(move || assemble::assemble(store.as_ref(), &plate))
            .await
            .map_err(|e| ReportError::Internal(format!("store lookup task failed: {e}")))??
    };
    let lookup_ms = lookup_start.elapsed().as_millis() as u64;
    info!(
        "Resolved car '{}' with {} damage record(s) in {}ms",
        document.car.license_plate,
        document.damages.len(),
        lookup_ms
    );

    // ── Step 4: Render ───────────────────────────────────────────────────
    let render_start = Instant::now();
    let pdf = render::render(&document).map_err(|e| {
        // Render failures are unexpected; log the detail here, expose none.
        error!("Report rendering failed: {}", e);
        e
    })?;
    let render_ms = render_start.elapsed().as_millis() as u64;

    let stats = RunStats {
        recognition_ms,
        recognition_retries: recognition.retries,
        lookup_ms,
        render_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
        damage_count: document.damages.len(),
    };
    info!(
        "Report complete for '{}': {} bytes PDF, {}ms total",
        plate,
        pdf.len(),
        stats.total_ms
    );

    Ok(ReportResponse {
        pdf,
        plate,
        document,
        stats,
    })
}

/// Generate a report and write the PDF directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_to_file(
    image_bytes: &[u8],
    store: Arc<dyn VehicleStore>,
    config: &ReportConfig,
    output_path: impl AsRef<Path>,
) -> Result<RunStats, ReportError> {
    let response = generate(image_bytes, store, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ReportError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &response.pdf)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(response.stats)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    image_bytes: &[u8],
    store: Arc<dyn VehicleStore>,
    config: &ReportConfig,
) -> Result<ReportResponse, ReportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReportError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(image_bytes, store, config))
}
