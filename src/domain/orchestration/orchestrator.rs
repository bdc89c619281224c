//! The stage machine: pure journey-advancement logic.
//!
//! Applies one turn's extraction outcome to a session: merges fields,
//! decides whether the current stage is satisfied, advances or holds,
//! and selects the reply. No extractor knowledge, no I/O.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::journey::{JourneyDefinition, StageTarget};
use crate::domain::session::ConversationSession;

use super::errors::OrchestrationError;

/// Reply of last resort; the chain is candidate reply -> stage prompt ->
/// this line, so a turn never produces an empty reply.
pub const CLARIFICATION_REPLY: &str =
    "Sorry, I didn't quite catch that. Could you say it again?";

/// What the stage machine decided for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnDecision {
    /// Reply to send back to the customer.
    pub reply: String,
    /// True if the stage cursor moved this turn.
    pub advanced: bool,
    /// True if the journey reached terminal this turn.
    pub completed: bool,
    /// Extractor fields dropped for being unknown or null.
    pub rejected_fields: Vec<String>,
}

/// Pure stage-advancement logic for one journey.
#[derive(Debug, Clone)]
pub struct StageMachine {
    journey: Arc<JourneyDefinition>,
}

impl StageMachine {
    /// Creates a stage machine over a loaded journey.
    pub fn new(journey: Arc<JourneyDefinition>) -> Self {
        Self { journey }
    }

    /// The journey this machine drives.
    pub fn journey(&self) -> &JourneyDefinition {
        &self.journey
    }

    /// Applies one turn's extraction outcome to the session.
    ///
    /// Fields are merged first (overwrite per field, unknown and null
    /// values dropped). The stage advances only when every required
    /// field of the active stage is present; the transition rules then
    /// pick the next stage or terminal. Holding and advancing both
    /// produce a non-empty reply.
    pub fn apply_turn(
        &self,
        session: &mut ConversationSession,
        fields: HashMap<String, serde_json::Value>,
        candidate_reply: Option<String>,
    ) -> Result<TurnDecision, OrchestrationError> {
        if !session.is_active() {
            return Err(OrchestrationError::SessionNotActive {
                status: session.status.to_string(),
            });
        }

        let rejected_fields =
            session.merge_fields(fields, |name| self.journey.knows_field(name));

        let stage = self
            .journey
            .stage(&session.current_stage_id)
            .ok_or_else(|| OrchestrationError::UnknownStage {
                stage: session.current_stage_id.to_string(),
            })?;

        if !stage.is_satisfied_by(&session.collected_data) {
            let reply = pick_reply(candidate_reply, &stage.prompt);
            return Ok(TurnDecision {
                reply,
                advanced: false,
                completed: false,
                rejected_fields,
            });
        }

        let target = stage
            .next_target(&session.collected_data)
            .ok_or_else(|| OrchestrationError::MissingTransition {
                stage: stage.id.to_string(),
            })?
            .clone();

        match target {
            StageTarget::Terminal => {
                // Cursor stays on the last real stage for reporting.
                session.complete();
                Ok(TurnDecision {
                    reply: self.journey.final_message().to_string(),
                    advanced: true,
                    completed: true,
                    rejected_fields,
                })
            }
            StageTarget::Stage(next_id) => {
                let next_stage = self.journey.stage(&next_id).ok_or_else(|| {
                    OrchestrationError::UnknownStage {
                        stage: next_id.to_string(),
                    }
                })?;
                let reply = pick_reply(candidate_reply, &next_stage.prompt);
                session.advance_to(next_id);
                Ok(TurnDecision {
                    reply,
                    advanced: true,
                    completed: false,
                    rejected_fields,
                })
            }
        }
    }
}

fn pick_reply(candidate: Option<String>, prompt: &str) -> String {
    match candidate {
        Some(reply) if !reply.trim().is_empty() => reply,
        _ if !prompt.trim().is_empty() => prompt.to_string(),
        _ => CLARIFICATION_REPLY.to_string(),
    }
}
