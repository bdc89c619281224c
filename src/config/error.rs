//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Extractor endpoint must be an http(s) URL")]
    InvalidExtractorEndpoint,

    #[error("Extractor timeout must be between 1 and 120 seconds")]
    InvalidExtractorTimeout,

    #[error("Journey directory cannot be empty")]
    EmptyJourneyDir,
}
