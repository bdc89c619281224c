//! Errors raised by the stage machine.

use thiserror::Error;

/// Failures while applying a turn to a session.
///
/// These indicate invariant breaches (a session cursor pointing outside
/// its journey), not user mistakes; they roll the turn back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("Session points at unknown stage '{stage}'")]
    UnknownStage { stage: String },

    #[error("Stage '{stage}' produced no transition target")]
    MissingTransition { stage: String },

    #[error("Session is {status}, not active")]
    SessionNotActive { status: String },
}
