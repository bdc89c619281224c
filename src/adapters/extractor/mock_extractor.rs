//! Mock Extractor for testing.
//!
//! Configurable mock implementation of the Extractor port, allowing
//! tests to run without a live NLU service.
//!
//! # Features
//!
//! - Pre-configured extractions, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for fallback-path testing
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{Extraction, ExtractionRequest, Extractor, ExtractorError};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return an extraction.
    Success(Extraction),
    /// Return an error.
    Error(MockError),
}

/// Mock error kinds for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    Unavailable { message: String },
    Timeout { timeout_secs: u32 },
    RateLimited { retry_after_secs: u32 },
    AuthenticationFailed,
    Network { message: String },
    Parse { message: String },
}

impl From<MockError> for ExtractorError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Unavailable { message } => ExtractorError::unavailable(message),
            MockError::Timeout { timeout_secs } => ExtractorError::timeout(timeout_secs),
            MockError::RateLimited { retry_after_secs } => {
                ExtractorError::rate_limited(retry_after_secs)
            }
            MockError::AuthenticationFailed => ExtractorError::AuthenticationFailed,
            MockError::Network { message } => ExtractorError::network(message),
            MockError::Parse { message } => ExtractorError::parse(message),
        }
    }
}

/// Mock extractor for testing.
#[derive(Debug, Clone, Default)]
pub struct MockExtractor {
    /// Pre-configured outcomes (consumed in order).
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<ExtractionRequest>>>,
}

impl MockExtractor {
    /// Creates a new mock with no queued outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful extraction.
    pub fn with_extraction(self, extraction: Extraction) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(extraction));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this extractor.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ExtractionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next outcome, defaulting to an empty extraction.
    fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockOutcome::Success(Extraction::empty()))
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, ExtractorError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_outcome() {
            MockOutcome::Success(extraction) => Ok(extraction),
            MockOutcome::Error(err) => Err(err.into()),
        }
    }
}
