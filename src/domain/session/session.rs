//! ConversationSession aggregate: live state of one journey run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, Intent, SessionId, SessionStatus, Timestamp};
use crate::domain::journey::StageId;

use super::turn::Turn;

/// Live state of one conversation for one customer and one intent.
///
/// Owned by the session store; handlers mutate a copy and commit it back
/// in a single `put`, so a failed turn never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: SessionId,
    pub customer_id: CustomerId,
    pub intent: Intent,
    /// Stage the conversation is currently collecting data for. At
    /// terminal this keeps the last real stage for reporting.
    pub current_stage_id: StageId,
    /// Field name -> extracted value. Overwrite per field, never shrinks
    /// outside an administrative reset.
    pub collected_data: HashMap<String, serde_json::Value>,
    /// Append-only turn history.
    pub history: Vec<Turn>,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationSession {
    /// Creates a fresh active session positioned at the entry stage.
    pub fn new(customer_id: CustomerId, intent: Intent, entry_stage: StageId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id: SessionId::new(),
            customer_id,
            intent,
            current_stage_id: entry_stage,
            collected_data: HashMap::new(),
            history: Vec::new(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a customer turn to the history.
    pub fn record_customer_turn(&mut self, text: impl Into<String>) {
        self.history.push(Turn::customer(text));
        self.touch();
    }

    /// Appends an agent turn to the history.
    pub fn record_agent_turn(&mut self, text: impl Into<String>) {
        self.history.push(Turn::agent(text));
        self.touch();
    }

    /// Merges extracted fields into the collected data.
    ///
    /// Null values and fields outside the journey schema are dropped;
    /// the dropped names are returned so the caller can log them. A
    /// field already present is overwritten (last extraction wins);
    /// unrelated fields are never touched.
    pub fn merge_fields<F>(
        &mut self,
        fields: HashMap<String, serde_json::Value>,
        known_field: F,
    ) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut rejected = Vec::new();
        for (name, value) in fields {
            if value.is_null() || !known_field(&name) {
                rejected.push(name);
                continue;
            }
            self.collected_data.insert(name, value);
        }
        if !rejected.is_empty() {
            rejected.sort();
        }
        self.touch();
        rejected
    }

    /// Moves the stage cursor.
    pub fn advance_to(&mut self, stage: StageId) {
        self.current_stage_id = stage;
        self.touch();
    }

    /// Marks the journey completed. The stage cursor is left on the last
    /// real stage for reporting.
    pub fn complete(&mut self) {
        debug_assert!(self.status.can_transition_to(&SessionStatus::Completed));
        self.status = SessionStatus::Completed;
        self.touch();
    }

    /// Marks the session abandoned.
    pub fn abandon(&mut self) {
        debug_assert!(self.status.can_transition_to(&SessionStatus::Abandoned));
        self.status = SessionStatus::Abandoned;
        self.touch();
    }

    /// Returns true if the session can still take turns.
    pub fn is_active(&self) -> bool {
        self.status.is_mutable()
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
