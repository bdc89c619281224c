//! In-Memory Session Store Adapter
//!
//! Keeps sessions and the (customer, intent) active index under one
//! RwLock, so resolve-or-create is atomic and reads across distinct
//! sessions proceed concurrently. State lives for the process lifetime
//! only.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerId, Intent, SessionId};
use crate::domain::journey::StageId;
use crate::domain::session::ConversationSession;
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<SessionId, ConversationSession>,
    /// Latest active session per (customer, intent) pair.
    active_index: HashMap<(CustomerId, Intent), SessionId>,
}

/// In-memory storage for conversation sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (useful for tests).
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Removes everything (useful for tests).
    pub async fn clear_all(&self) {
        let mut inner = self.inner.write().await;
        inner.sessions.clear();
        inner.active_index.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(
        &self,
        customer_id: &CustomerId,
        intent: &Intent,
        entry_stage: &StageId,
    ) -> Result<(SessionId, ConversationSession), SessionStoreError> {
        let mut inner = self.inner.write().await;
        let key = (customer_id.clone(), intent.clone());

        if let Some(&existing_id) = inner.active_index.get(&key) {
            let existing = inner
                .sessions
                .get(&existing_id)
                .filter(|session| session.is_active())
                .cloned();
            match existing {
                Some(session) => return Ok((existing_id, session)),
                // Completed/abandoned sessions are replaceable.
                None => {
                    inner.active_index.remove(&key);
                }
            }
        }

        // Starting a new conversation abandons the customer's other
        // active conversations under different intents.
        let stale: Vec<(CustomerId, Intent)> = inner
            .active_index
            .keys()
            .filter(|(cust, _)| cust == customer_id)
            .cloned()
            .collect();
        for stale_key in stale {
            if let Some(stale_id) = inner.active_index.remove(&stale_key) {
                if let Some(orphan) = inner.sessions.get_mut(&stale_id) {
                    if orphan.is_active() {
                        tracing::info!(
                            session_id = %stale_id,
                            old_intent = %stale_key.1,
                            new_intent = %intent,
                            "abandoning prior session on intent change"
                        );
                        orphan.abandon();
                    }
                }
            }
        }

        let session = ConversationSession::new(
            customer_id.clone(),
            intent.clone(),
            entry_stage.clone(),
        );
        let session_id = session.session_id;
        inner.sessions.insert(session_id, session.clone());
        inner.active_index.insert(key, session_id);

        Ok((session_id, session))
    }

    async fn get(&self, session_id: SessionId) -> Result<ConversationSession, SessionStoreError> {
        let inner = self.inner.read().await;
        inner
            .sessions
            .get(&session_id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(session_id))
    }

    async fn put(
        &self,
        session_id: SessionId,
        session: ConversationSession,
    ) -> Result<(), SessionStoreError> {
        let mut inner = self.inner.write().await;
        let key = (session.customer_id.clone(), session.intent.clone());
        if !session.is_active() && inner.active_index.get(&key) == Some(&session_id) {
            inner.active_index.remove(&key);
        }
        inner.sessions.insert(session_id, session);
        Ok(())
    }

    async fn clear(&self, session_id: SessionId) -> Result<(), SessionStoreError> {
        let mut inner = self.inner.write().await;
        inner.sessions.remove(&session_id);
        inner.active_index.retain(|_, id| *id != session_id);
        Ok(())
    }
}
