//! HTTP Extractor - Implementation of the Extractor port over a remote
//! NLU service.
//!
//! Posts `{utterance, target_fields, history}` as JSON to the configured
//! endpoint and expects `{extracted_fields, candidate_reply}` back. The
//! client carries a bounded timeout; upstream faults map onto the typed
//! `ExtractorError` variants so the turn handler can apply its fallback
//! policy.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpExtractorConfig::new("https://nlu.internal", api_key)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let extractor = HttpExtractor::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::ports::{Extraction, ExtractionRequest, Extractor, ExtractorError};

/// Configuration for the HTTP extractor.
#[derive(Debug, Clone)]
pub struct HttpExtractorConfig {
    /// Base URL of the extraction service.
    pub endpoint: String,
    /// API key for authentication.
    api_key: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpExtractorConfig {
    /// Creates a new configuration.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Secret::new(api_key.into()),
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Extractor backed by a remote extraction service.
pub struct HttpExtractor {
    config: HttpExtractorConfig,
    client: Client,
}

impl HttpExtractor {
    /// Creates a new HTTP extractor with the given configuration.
    pub fn new(config: HttpExtractorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the extraction endpoint URL.
    fn extract_url(&self) -> String {
        format!("{}/v1/extract", self.config.endpoint.trim_end_matches('/'))
    }

    async fn send_request(&self, request: &ExtractionRequest) -> Result<Response, ExtractorError> {
        self.client
            .post(self.extract_url())
            .bearer_auth(self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::timeout(self.config.timeout.as_secs() as u32)
                } else if e.is_connect() {
                    ExtractorError::network(format!("Connection failed: {}", e))
                } else {
                    ExtractorError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses onto typed errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, ExtractorError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(ExtractorError::AuthenticationFailed),
            429 => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(30);
                Err(ExtractorError::rate_limited(retry_after))
            }
            500..=599 => {
                let body = response.text().await.unwrap_or_default();
                Err(ExtractorError::unavailable(format!(
                    "Server error {}: {}",
                    status, body
                )))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ExtractorError::network(format!(
                    "Unexpected status {}: {}",
                    status, body
                )))
            }
        }
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, ExtractorError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        response
            .json::<Extraction>()
            .await
            .map_err(|e| ExtractorError::parse(e.to_string()))
    }
}
