//! Extractor Port - Interface for the natural-language understanding
//! collaborator.
//!
//! The orchestrator hands an utterance, the fields the active stage still
//! needs, and the conversation history to an extractor; it gets back zero
//! or more field values and an optional candidate reply. Implementations
//! must fail explicitly (typed error) rather than silently returning
//! empty on an upstream fault, so the turn handler can apply its
//! fallback policy.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::session::Turn;

/// Port for free-text-to-structured-field extraction.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts field values (and optionally a reply) from one utterance.
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, ExtractorError>;
}

/// One extraction call's input.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    /// The raw customer utterance for this turn.
    pub utterance: String,
    /// Fields the active stage still needs.
    pub target_fields: Vec<String>,
    /// Full conversation history for context.
    pub history: Vec<Turn>,
}

impl ExtractionRequest {
    /// Creates a request for one utterance.
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            target_fields: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Sets the fields the extractor should look for.
    pub fn with_target_fields(mut self, fields: Vec<String>) -> Self {
        self.target_fields = fields;
        self
    }

    /// Attaches conversation history for context.
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }
}

/// One extraction call's outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Field name -> extracted value. May be empty.
    #[serde(default)]
    pub extracted_fields: HashMap<String, serde_json::Value>,
    /// Free-text reply the extractor proposes, if any.
    #[serde(default)]
    pub candidate_reply: Option<String>,
}

impl Extraction {
    /// An extraction with no fields and no reply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds one extracted field.
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.extracted_fields.insert(name.into(), value);
        self
    }

    /// Sets the candidate reply.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.candidate_reply = Some(reply.into());
        self
    }
}

/// Extractor errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// The extraction service is unavailable.
    #[error("extraction service unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The call exceeded its deadline.
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with something unparseable.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ExtractorError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractorError::Unavailable { .. }
                | ExtractorError::Timeout { .. }
                | ExtractorError::RateLimited { .. }
                | ExtractorError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_builder_works() {
        let request = ExtractionRequest::new("I have chest pain")
            .with_target_fields(vec!["symptom".to_string()])
            .with_history(vec![Turn::agent("What symptoms are you experiencing?")]);

        assert_eq!(request.utterance, "I have chest pain");
        assert_eq!(request.target_fields, vec!["symptom"]);
        assert_eq!(request.history.len(), 1);
    }

    #[test]
    fn extraction_builder_works() {
        let extraction = Extraction::empty()
            .with_field("symptom", json!("chest pain"))
            .with_reply("Got it. Which area should we search near?");

        assert_eq!(extraction.extracted_fields["symptom"], json!("chest pain"));
        assert!(extraction.candidate_reply.is_some());
    }

    #[test]
    fn extraction_deserializes_with_missing_parts() {
        let extraction: Extraction = serde_json::from_str("{}").unwrap();
        assert!(extraction.extracted_fields.is_empty());
        assert!(extraction.candidate_reply.is_none());
    }

    #[test]
    fn retryable_classification() {
        assert!(ExtractorError::unavailable("down").is_retryable());
        assert!(ExtractorError::timeout(15).is_retryable());
        assert!(ExtractorError::rate_limited(30).is_retryable());
        assert!(ExtractorError::network("reset").is_retryable());

        assert!(!ExtractorError::AuthenticationFailed.is_retryable());
        assert!(!ExtractorError::parse("bad json").is_retryable());
    }

    #[test]
    fn errors_display_correctly() {
        assert_eq!(
            ExtractorError::timeout(15).to_string(),
            "extraction timed out after 15s"
        );
        assert_eq!(
            ExtractorError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
    }
}
