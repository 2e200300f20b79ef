//! Runtime settings for the recognition pipeline.

use std::time::Duration;

/// NVCF asset creation endpoint.
pub const DEFAULT_ASSETS_URL: &str = "https://api.nvcf.nvidia.com/v2/nvcf/assets";

/// OCDRNet function invocation endpoint.
pub const DEFAULT_INVOKE_URL: &str = "https://ai.api.nvidia.com/v1/cv/nvidia/ocdrnet";

/// Pending-execution status endpoint (asset id appended per request).
pub const DEFAULT_STATUS_URL: &str = "https://api.nvcf.nvidia.com/v2/nvcf/pexec/status";

/// Result retrieval endpoint (asset id appended per request).
pub const DEFAULT_RESULT_URL: &str = "https://api.nvcf.nvidia.com/v2/nvcf/pexec/result";

/// Environment variable holding the NGC API key.
pub const API_KEY_VAR: &str = "NGC_PERSONAL_API_KEY";

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default ceiling on total poll attempts per job.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

/// Default timeout for JSON API calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the binary asset upload.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for one processing run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer token for the NVCF API.
    pub api_key: String,
    /// Asset creation endpoint.
    pub assets_url: String,
    /// Function invocation endpoint.
    pub invoke_url: String,
    /// Status poll endpoint base.
    pub status_url: String,
    /// Result retrieval endpoint base.
    pub result_url: String,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Ceiling on total poll attempts per job, covering both pending
    /// responses and transient poll failures.
    pub max_poll_attempts: u32,
    /// Timeout for JSON API calls.
    pub request_timeout: Duration,
    /// Timeout for the binary asset upload.
    pub upload_timeout: Duration,
}

impl Settings {
    /// Create settings with the documented defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            assets_url: DEFAULT_ASSETS_URL.to_string(),
            invoke_url: DEFAULT_INVOKE_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            result_url: DEFAULT_RESULT_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Set the delay between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the ceiling on total poll attempts per job.
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Set the timeout for JSON API calls.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new("nvapi-test");
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.max_poll_attempts, 30);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.upload_timeout, Duration::from_secs(300));
        assert!(settings.assets_url.starts_with("https://"));
    }

    #[test]
    fn test_builders() {
        let settings = Settings::new("nvapi-test")
            .with_poll_interval(Duration::from_millis(500))
            .with_max_poll_attempts(5);
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.max_poll_attempts, 5);
    }
}
