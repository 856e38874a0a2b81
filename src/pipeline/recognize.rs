//! Recognition service adapter: image bytes in, raw OCR text out.
//!
//! This module owns the only network I/O in the pipeline. It is
//! intentionally thin — it shapes the request the vendor expects, applies
//! the configured deadline and retry budget, and extracts the one field the
//! rest of the pipeline cares about (`plate_text` of the first result).
//!
//! ## Retry Strategy
//!
//! Only transport failures (connect error, timeout) are retried, with
//! exponential backoff (`retry_backoff_ms * 2^attempt`): with 500 ms base
//! and 1 retry the wait is a single 500 ms pause. A non-2xx response is a
//! definitive upstream answer — the vendor saw the request and rejected
//! it — and is surfaced immediately, never retried.

use crate::config::ReportConfig;
use crate::error::ReportError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Request body the recognition vendor expects.
///
/// Field names are the vendor's wire contract, not ours.
#[derive(Debug, Serialize)]
struct RecognitionRequest {
    #[serde(rename = "base64ImageString")]
    base64_image_string: String,
    #[serde(rename = "languageCode")]
    language_code: &'static str,
    plate_output: &'static str,
}

/// One element of the vendor's result array.
///
/// `plate_text` is optional so a present-but-null or missing field parses
/// instead of failing the whole body; absence is then reported precisely.
#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    plate_text: Option<String>,
}

/// Outcome of a successful recognition call.
#[derive(Debug)]
pub struct Recognition {
    /// Raw OCR text as returned by the vendor, noise included.
    pub text: String,
    /// Transport retries the call needed (0 = first try worked).
    pub retries: u32,
}

/// Submit an image to the recognition service and return the raw OCR text.
///
/// The image bytes are passed through untouched — no format validation, no
/// re-encoding. The vendor does its own decoding and answers with whatever
/// text it read off the plate, noise included; canonicalisation is the next
/// stage's job.
pub async fn submit(image_bytes: &[u8], config: &ReportConfig) -> Result<Recognition, ReportError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .build()
        .map_err(|e| ReportError::Internal(format!("HTTP client construction failed: {e}")))?;

    let body = RecognitionRequest {
        base64_image_string: STANDARD.encode(image_bytes),
        language_code: "auto",
        plate_output: "yes",
    };
    debug!(
        "Submitting {} image bytes ({} base64) to {}",
        image_bytes.len(),
        body.base64_image_string.len(),
        config.recognition_url
    );

    let mut last_err: Option<String> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "Recognition call: retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let request = client
            .post(&config.recognition_url)
            .basic_auth(&config.username, Some(&config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Upstream answered; do not retry its decision.
                    return Err(ReportError::ExternalService {
                        status: status.as_u16(),
                    });
                }
                let text = extract_plate_text(response).await?;
                return Ok(Recognition {
                    text,
                    retries: attempt,
                });
            }
            Err(e) => {
                let detail = if e.is_timeout() {
                    format!("timed out after {}s", config.api_timeout_secs)
                } else {
                    e.to_string()
                };
                warn!("Recognition call: attempt {} failed — {}", attempt + 1, detail);
                last_err = Some(detail);
            }
        }
    }

    Err(ReportError::ExternalServiceUnreachable {
        attempts: config.max_retries + 1,
        detail: last_err.unwrap_or_else(|| "unknown transport error".to_string()),
    })
}

/// Pull `plate_text` out of the first element of a 2xx response body.
async fn extract_plate_text(response: reqwest::Response) -> Result<String, ReportError> {
    let results: Vec<RecognitionResult> =
        response
            .json()
            .await
            .map_err(|e| ReportError::MalformedResponse {
                detail: format!("body is not a JSON result array: {e}"),
            })?;

    // Only the first element is consulted; the vendor orders candidates by
    // confidence.
    let first = results.first().ok_or_else(|| ReportError::MalformedResponse {
        detail: "empty result array".into(),
    })?;

    let text = first
        .plate_text
        .as_deref()
        .ok_or_else(|| ReportError::MalformedResponse {
            detail: "first result has no plate_text".into(),
        })?;

    debug!("Recognition service returned plate_text: {:?}", text);
    Ok(text.to_string())
}
