//! Configuration for report generation.
//!
//! All pipeline behaviour is controlled through [`ReportConfig`], built via
//! its [`ReportConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across requests and to diff two runs to
//! understand why their outcomes differ.
//!
//! # Design choice: explicit timeout and retry budget
//! The recognition call is the only unbounded external dependency in the
//! pipeline, so its deadline and retry budget are required configuration
//! rather than hard-coded defaults buried in the adapter. Retries apply
//! only to transport failures (connect error, timeout); a non-2xx response
//! is a definitive upstream answer and is never retried.

use crate::error::ReportError;
use std::fmt;

/// Default endpoint of the production plate-recognition service.
pub const DEFAULT_RECOGNITION_URL: &str = "https://gatiosoft.ro/platebber.aspx";

/// Configuration for a report-generation pipeline.
///
/// Built via [`ReportConfig::builder()`].
///
/// # Example
/// ```rust
/// use platereport::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .credentials("user", "secret")
///     .api_timeout_secs(10)
///     .max_retries(1)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ReportConfig {
    /// Recognition service endpoint. Default: [`DEFAULT_RECOGNITION_URL`].
    ///
    /// Overridable so tests and staging environments can point the adapter
    /// at a local stub without touching the request shape.
    pub recognition_url: String,

    /// Basic-auth username for the recognition service.
    pub username: String,

    /// Basic-auth password for the recognition service.
    pub password: String,

    /// Per-call timeout for the recognition request in seconds. Default: 30.
    ///
    /// The third party sets no deadline of its own; without this cap an
    /// unresponsive endpoint would stall the whole pipeline indefinitely.
    pub api_timeout_secs: u64,

    /// Maximum retry attempts on a transport failure. Default: 1.
    ///
    /// A single bounded retry catches the common connection blip without
    /// hammering a struggling endpoint. Non-2xx responses are not retried.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,
}

impl fmt::Debug for ReportConfig {
    // Manual impl so the password never lands in a log line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("recognition_url", &self.recognition_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

impl ReportConfig {
    /// Create a new builder for `ReportConfig`.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder {
            config: ReportConfig {
                recognition_url: DEFAULT_RECOGNITION_URL.to_string(),
                username: String::new(),
                password: String::new(),
                api_timeout_secs: 30,
                max_retries: 1,
                retry_backoff_ms: 500,
            },
        }
    }
}

/// Builder for [`ReportConfig`].
#[derive(Debug)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn recognition_url(mut self, url: impl Into<String>) -> Self {
        self.config.recognition_url = url.into();
        self
    }

    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.username = username.into();
        self.config.password = password.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReportConfig, ReportError> {
        let c = &self.config;
        if c.recognition_url.is_empty() {
            return Err(ReportError::InvalidConfig(
                "Recognition URL must not be empty".into(),
            ));
        }
        if c.username.is_empty() || c.password.is_empty() {
            return Err(ReportError::InvalidConfig(
                "Recognition service credentials are required".into(),
            ));
        }
        Ok(self.config)
    }
}
