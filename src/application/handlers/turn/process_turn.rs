//! ProcessTurnHandler - drive one conversation turn end to end.
//!
//! Resolves the journey and session, runs the extractor under a bounded
//! timeout, applies the stage machine, and commits the updated session
//! in a single `put`. A fault before the commit leaves the stored state
//! at its pre-turn snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::session_locks::SessionLocks;
use crate::domain::foundation::{CustomerId, Intent, SessionId};
use crate::domain::journey::JourneyRegistry;
use crate::domain::orchestration::{OrchestrationError, StageMachine, CLARIFICATION_REPLY};
use crate::domain::session::ConversationSession;
use crate::ports::{ExtractionRequest, Extractor, SessionStore, SessionStoreError};

/// Command to process one customer utterance.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub customer_id: CustomerId,
    pub intent: Intent,
    pub utterance: String,
    /// Advisory communication-channel hint (e.g. "WHATSAPP"). Logged,
    /// never used for orchestration decisions.
    pub channel: Option<String>,
}

/// Result of processing a turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnResult {
    pub session_id: SessionId,
    pub reply: String,
    pub session: ConversationSession,
}

/// Error type for turn processing.
#[derive(Debug, Clone)]
pub enum ProcessTurnError {
    /// No journey is registered for the intent.
    UnknownIntent(Intent),
    /// Session store failure.
    Store(String),
    /// Stage machine invariant breach.
    Orchestration(String),
}

impl std::fmt::Display for ProcessTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessTurnError::UnknownIntent(intent) => {
                write!(f, "No journey registered for intent: {}", intent)
            }
            ProcessTurnError::Store(err) => write!(f, "Session store error: {}", err),
            ProcessTurnError::Orchestration(err) => write!(f, "Orchestration error: {}", err),
        }
    }
}

impl std::error::Error for ProcessTurnError {}

impl From<SessionStoreError> for ProcessTurnError {
    fn from(err: SessionStoreError) -> Self {
        ProcessTurnError::Store(err.to_string())
    }
}

impl From<OrchestrationError> for ProcessTurnError {
    fn from(err: OrchestrationError) -> Self {
        ProcessTurnError::Orchestration(err.to_string())
    }
}

/// Handler for processing conversation turns.
pub struct ProcessTurnHandler {
    store: Arc<dyn SessionStore>,
    extractor: Arc<dyn Extractor>,
    journeys: Arc<JourneyRegistry>,
    locks: SessionLocks,
    extraction_timeout: Duration,
}

impl ProcessTurnHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        extractor: Arc<dyn Extractor>,
        journeys: Arc<JourneyRegistry>,
    ) -> Self {
        Self {
            store,
            extractor,
            journeys,
            locks: SessionLocks::new(),
            extraction_timeout: Duration::from_secs(15),
        }
    }

    /// Overrides the extraction deadline.
    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: ProcessTurnCommand,
    ) -> Result<ProcessTurnResult, ProcessTurnError> {
        let journey = self
            .journeys
            .get(&cmd.intent)
            .ok_or_else(|| ProcessTurnError::UnknownIntent(cmd.intent.clone()))?;

        tracing::debug!(
            customer_id = %cmd.customer_id,
            intent = %cmd.intent,
            channel = cmd.channel.as_deref().unwrap_or("default"),
            "processing turn"
        );

        // Serialize turns on this conversation; turns elsewhere proceed.
        let _guard = self.locks.acquire(&cmd.customer_id, &cmd.intent).await;

        let (session_id, mut session) = self
            .store
            .get_or_create(&cmd.customer_id, &cmd.intent, journey.entry_stage_id())
            .await?;

        session.record_customer_turn(&cmd.utterance);

        let stage = journey.stage(&session.current_stage_id).ok_or_else(|| {
            ProcessTurnError::Orchestration(format!(
                "session {} points at unknown stage '{}'",
                session_id, session.current_stage_id
            ))
        })?;
        let pending: Vec<String> = stage
            .missing_fields(&session.collected_data)
            .into_iter()
            .map(String::from)
            .collect();

        let request = ExtractionRequest::new(&cmd.utterance)
            .with_target_fields(pending)
            .with_history(session.history.clone());

        let machine = StageMachine::new(journey);
        let reply = match timeout(self.extraction_timeout, self.extractor.extract(request)).await
        {
            Ok(Ok(extraction)) => {
                let decision = machine.apply_turn(
                    &mut session,
                    extraction.extracted_fields,
                    extraction.candidate_reply,
                )?;
                if !decision.rejected_fields.is_empty() {
                    tracing::warn!(
                        session_id = %session_id,
                        fields = ?decision.rejected_fields,
                        "dropped extractor fields outside the journey schema"
                    );
                }
                if decision.completed {
                    tracing::info!(session_id = %session_id, "journey completed");
                }
                decision.reply
            }
            Ok(Err(err)) => {
                // Recoverable: hold the stage, ask the customer to retry.
                tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "extraction unavailable, turn does not advance"
                );
                CLARIFICATION_REPLY.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    timeout_secs = self.extraction_timeout.as_secs(),
                    "extraction timed out, turn does not advance"
                );
                CLARIFICATION_REPLY.to_string()
            }
        };

        session.record_agent_turn(&reply);

        // Single commit point: nothing above touched the stored state.
        self.store.put(session_id, session.clone()).await?;

        Ok(ProcessTurnResult {
            session_id,
            reply,
            session,
        })
    }
}
