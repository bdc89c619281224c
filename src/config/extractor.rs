//! Extraction service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the remote extraction service
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Base URL of the extraction service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key for the extraction service
    #[serde(default)]
    pub api_key: Option<Secret<String>>,

    /// Per-call extraction deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ExtractorConfig {
    /// The extraction deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate extractor configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidExtractorEndpoint);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidExtractorTimeout);
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9090".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}
