//! ClearSessionHandler - administrative session removal.
//!
//! Normal turn processing never deletes sessions; this is the explicit
//! administrative reset.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// Command to clear all state for a session.
#[derive(Debug, Clone)]
pub struct ClearSessionCommand {
    pub session_id: SessionId,
}

/// Error type for clearing sessions.
#[derive(Debug, Clone)]
pub enum ClearSessionError {
    /// Storage error.
    Store(String),
}

impl std::fmt::Display for ClearSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClearSessionError::Store(err) => write!(f, "Session store error: {}", err),
        }
    }
}

impl std::error::Error for ClearSessionError {}

impl From<SessionStoreError> for ClearSessionError {
    fn from(err: SessionStoreError) -> Self {
        ClearSessionError::Store(err.to_string())
    }
}

/// Handler for administrative session clearing. Idempotent: clearing a
/// session that does not exist succeeds.
pub struct ClearSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl ClearSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: ClearSessionCommand) -> Result<(), ClearSessionError> {
        self.store.clear(cmd.session_id).await?;
        tracing::info!(session_id = %cmd.session_id, "session cleared");
        Ok(())
    }
}
