//! GetSessionHandler - fetch raw session state for diagnostics.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::ConversationSession;
use crate::ports::{SessionStore, SessionStoreError};

/// Query for a session's raw state.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Error type for session lookup.
#[derive(Debug, Clone)]
pub enum GetSessionError {
    /// No session under that id.
    NotFound(SessionId),
    /// Storage error.
    Store(String),
}

impl std::fmt::Display for GetSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetSessionError::NotFound(id) => write!(f, "Session not found: {}", id),
            GetSessionError::Store(err) => write!(f, "Session store error: {}", err),
        }
    }
}

impl std::error::Error for GetSessionError {}

impl From<SessionStoreError> for GetSessionError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => GetSessionError::NotFound(id),
            other => GetSessionError::Store(other.to_string()),
        }
    }
}

/// Handler for the read-only session diagnostic lookup.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetSessionQuery,
    ) -> Result<ConversationSession, GetSessionError> {
        Ok(self.store.get(query.session_id).await?)
    }
}
