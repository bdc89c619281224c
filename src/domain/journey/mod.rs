//! Journey definitions: declarative stage graphs, one per intent.
//!
//! A journey is loaded once at startup, validated, and shared read-only
//! by every session that converses under its intent.

mod definition;
mod loader;
mod registry;
mod stage;

pub use definition::{JourneyDefinition, JourneyDocument, MalformedJourney};
pub use loader::{load_journey_dir, parse_journey_yaml, JourneyLoadError, ParseJourneyError};
pub use registry::JourneyRegistry;
pub use stage::{FieldCondition, Stage, StageId, StageTarget, TransitionRule, TERMINAL_MARKER};
