//! Journey orchestration: the pure stage state machine.

mod errors;
mod orchestrator;

pub use errors::OrchestrationError;
pub use orchestrator::{StageMachine, TurnDecision, CLARIFICATION_REPLY};
