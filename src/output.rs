//! Output types: the assembled report document and the rendered response.

use crate::store::{CarRecord, DamageRecord};
use serde::{Deserialize, Serialize};

/// Media type of a rendered report.
pub const REPORT_MEDIA_TYPE: &str = "application/pdf";

/// Download filename of a rendered report.
pub const REPORT_FILENAME: &str = "report.pdf";

/// One car paired with its damage history, snapshotted for rendering.
///
/// Created once per successful run and never mutated afterwards. Damage
/// order is whatever the store returned; the renderer does not re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub car: CarRecord,
    pub damages: Vec<DamageRecord>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ReportResponse {
    /// The complete, self-contained PDF.
    pub pdf: Vec<u8>,
    /// The canonical plate the report was generated for.
    pub plate: String,
    /// The document the PDF was rendered from, for callers that want the
    /// structured data alongside the bytes.
    pub document: ReportDocument,
    /// Per-stage timings and counters for this run.
    pub stats: RunStats,
}

impl ReportResponse {
    /// Filename an HTTP layer should advertise in `Content-Disposition`.
    pub fn filename(&self) -> &'static str {
        REPORT_FILENAME
    }

    /// Media type an HTTP layer should answer with.
    pub fn media_type(&self) -> &'static str {
        REPORT_MEDIA_TYPE
    }

    /// Value for a `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", REPORT_FILENAME)
    }
}

/// Statistics for a single pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Wall-clock time of the recognition call, including retries.
    pub recognition_ms: u64,
    /// Transport retries the recognition call needed (0 = first try worked).
    pub recognition_retries: u32,
    /// Wall-clock time of the car + damage lookups.
    pub lookup_ms: u64,
    /// Wall-clock time of PDF rendering.
    pub render_ms: u64,
    /// Total wall-clock time of the run.
    pub total_ms: u64,
    /// Number of damage records in the rendered report.
    pub damage_count: usize,
}
