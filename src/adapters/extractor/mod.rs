//! Extractor adapters: the remote NLU client and the test mock.

mod http_extractor;
mod mock_extractor;

pub use http_extractor::{HttpExtractor, HttpExtractorConfig};
pub use mock_extractor::{MockError, MockExtractor, MockOutcome};
