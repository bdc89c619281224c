//! Session Store Port - Interface for keyed session state.
//!
//! Two-level lookup: (customer, intent) resolves to a session id, the id
//! resolves to state. The store exclusively owns session objects;
//! handlers receive copies and commit them back with `put`.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, Intent, SessionId};
use crate::domain::journey::StageId;
use crate::domain::session::ConversationSession;

/// Errors that can occur during session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session store backend error: {0}")]
    Backend(String),
}

/// Port for persisting and resolving conversation sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the active session for a (customer, intent) pair, creating
    /// one positioned at `entry_stage` if none exists.
    ///
    /// Only an *active* session is reused; completed and abandoned
    /// sessions are replaceable. Creation must be atomic with the
    /// lookup so two concurrent callers resolve the same session.
    async fn get_or_create(
        &self,
        customer_id: &CustomerId,
        intent: &Intent,
        entry_stage: &StageId,
    ) -> Result<(SessionId, ConversationSession), SessionStoreError>;

    /// Loads a session by id.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists.
    async fn get(&self, session_id: SessionId) -> Result<ConversationSession, SessionStoreError>;

    /// Atomically replaces the stored state for a session.
    async fn put(
        &self,
        session_id: SessionId,
        session: ConversationSession,
    ) -> Result<(), SessionStoreError>;

    /// Removes all stored state for a session. Administrative only;
    /// normal turn processing never calls this.
    async fn clear(&self, session_id: SessionId) -> Result<(), SessionStoreError>;
}
