//! SessionStatus enum for tracking lifecycle of conversation sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

impl SessionStatus {
    /// Returns true if the session can still take turns.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Active -> Completed
    /// - Active -> Abandoned
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Abandoned))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn only_active_is_mutable() {
        assert!(SessionStatus::Active.is_mutable());
        assert!(!SessionStatus::Completed.is_mutable());
        assert!(!SessionStatus::Abandoned.is_mutable());
    }

    #[test]
    fn active_can_complete_or_abandon() {
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Abandoned));
    }

    #[test]
    fn terminal_states_are_absorbing() {
        assert!(!SessionStatus::Completed.can_transition_to(&SessionStatus::Active));
        assert!(!SessionStatus::Completed.can_transition_to(&SessionStatus::Abandoned));
        assert!(!SessionStatus::Abandoned.can_transition_to(&SessionStatus::Active));
        assert!(!SessionStatus::Abandoned.can_transition_to(&SessionStatus::Completed));
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(SessionStatus::Abandoned.to_string(), "abandoned");
    }
}
