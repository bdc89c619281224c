//! Turn records: the canonical, immutable conversation history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The customer's utterance.
    Customer,
    /// The orchestrated reply.
    Agent,
}

/// One entry of a session's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Turn {
    /// Creates a customer turn stamped now.
    pub fn customer(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Customer,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an agent turn stamped now.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }
}
