//! Error types for the platereport library.
//!
//! Every failure a pipeline run can end in is a distinct [`ReportError`]
//! variant, so callers can match on the terminal state instead of parsing
//! message strings. The outward-facing mapping (status code plus a safe
//! detail message) lives on the type itself — see
//! [`ReportError::status_code`] and [`ReportError::public_detail`] — so an
//! HTTP layer wrapping this crate never has to invent its own taxonomy.
//!
//! Two rules govern the mapping:
//!
//! * A recognition-service rejection carries the **upstream** status through
//!   unchanged; this crate does not second-guess the third party.
//! * Render and internal failures never leak detail to the caller. The
//!   detail is logged at the orchestrator boundary and collapsed to a
//!   generic message here.

use thiserror::Error;

/// All errors returned by the platereport library.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Recognition errors ────────────────────────────────────────────────
    /// The recognition service answered with a non-2xx status.
    ///
    /// A definitive upstream answer, not a transport glitch; never retried.
    #[error("Recognition service returned HTTP {status}")]
    ExternalService { status: u16 },

    /// The recognition service could not be reached within the configured
    /// timeout and retry budget.
    #[error("Recognition service unreachable after {attempts} attempt(s): {detail}")]
    ExternalServiceUnreachable { attempts: u32, detail: String },

    /// The recognition service answered 2xx but the body was unusable:
    /// not a JSON array, an empty array, or a first element without a
    /// `plate_text` string.
    #[error("Recognition service returned an unusable body: {detail}")]
    MalformedResponse { detail: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// Canonicalisation found no alphanumeric token in the OCR text.
    ///
    /// Reported distinctly from [`ReportError::CarNotFound`]: no vehicle
    /// lookup was ever attempted.
    #[error("No license plate detected in image")]
    NoPlateDetected,

    /// The canonical plate matched no known vehicle.
    #[error("No car found for plate '{plate}'")]
    CarNotFound { plate: String },

    /// The vehicle store failed while looking up a car or its damages.
    #[error("Vehicle store error: {detail}")]
    StoreFailed { detail: String },

    /// PDF rendering failed. Unexpected by construction — the renderer is a
    /// pure formatting function — and therefore collapsed to an internal
    /// error outwardly.
    #[error("Report rendering failed: {detail}")]
    RenderFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the rendered PDF to the requested path.
    #[error("Failed to write report file {path:?}: {source}")]
    OutputWriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// The status code an HTTP layer should answer with for this error.
    ///
    /// The recognition service's own status is passed through unchanged;
    /// everything unexpected collapses to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ReportError::ExternalService { status } => *status,
            ReportError::ExternalServiceUnreachable { .. } => 502,
            // An unusable 2xx body means the service saw no plate worth
            // reporting; outwardly equivalent to "no plate detected".
            ReportError::MalformedResponse { .. } => 422,
            ReportError::NoPlateDetected => 422,
            ReportError::CarNotFound { .. } => 404,
            ReportError::StoreFailed { .. }
            | ReportError::RenderFailed { .. }
            | ReportError::OutputWriteFailed { .. }
            | ReportError::InvalidConfig(_)
            | ReportError::Internal(_) => 500,
        }
    }

    /// The detail message an HTTP layer should expose for this error.
    ///
    /// Fixed strings only — internal diagnostics stay in the logs.
    pub fn public_detail(&self) -> &'static str {
        match self {
            ReportError::ExternalService { .. }
            | ReportError::ExternalServiceUnreachable { .. } => {
                "Failed to upload image to external API"
            }
            ReportError::MalformedResponse { .. } | ReportError::NoPlateDetected => {
                "No license plate detected"
            }
            ReportError::CarNotFound { .. } => "Car not found",
            ReportError::StoreFailed { .. }
            | ReportError::RenderFailed { .. }
            | ReportError::OutputWriteFailed { .. }
            | ReportError::InvalidConfig(_)
            | ReportError::Internal(_) => "Internal Server Error",
        }
    }
}
