//! Adapters: concrete implementations of the ports plus the HTTP surface.

pub mod extractor;
pub mod http;
pub mod store;

pub use extractor::{HttpExtractor, HttpExtractorConfig, MockError, MockExtractor, MockOutcome};
pub use store::InMemorySessionStore;
