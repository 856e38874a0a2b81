//! Pipeline stages for report generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch recognition vendor) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! recognize ──▶ canonical ──▶ assemble ──▶ render
//! (image→OCR)   (OCR→plate)  (plate→data)  (data→PDF)
//! ```
//!
//! 1. [`recognize`] — submit the image to the external recognition service;
//!    the only stage with network I/O
//! 2. [`canonical`] — reduce the noisy OCR text to a canonical plate;
//!    a pure function, safe to call concurrently without synchronisation
//! 3. [`assemble`] — resolve the plate against the vehicle store; runs on
//!    the blocking thread pool because stores are blocking I/O
//! 4. [`render`]   — lay the assembled document out as a single-page PDF;
//!    deterministic byte output

pub mod assemble;
pub mod canonical;
pub mod recognize;
pub mod render;
