//! In-memory session context store.
//!
//! Each session id maps to its own `Mutex<SessionContext>`. A caller holds
//! that lock for a whole turn, so turns for one session are serialized
//! while different sessions proceed in parallel. Contexts live for the
//! lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::context::SessionContext;

/// Shared handle to one session's context.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Mapping from session id to context.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `session_id`, creating an empty context on first contact.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "new session");
                Arc::new(Mutex::new(SessionContext::new()))
            })
            .clone()
    }

    /// Replace the stored context for `session_id`.
    pub async fn save(&self, session_id: &str, context: SessionContext) {
        let handle = self.get_or_create(session_id).await;
        *handle.lock().await = context;
    }

    /// Copy of the current context, if the session exists.
    pub async fn snapshot(&self, session_id: &str) -> Option<SessionContext> {
        let handle = self.sessions.read().await.get(session_id).cloned()?;
        let ctx = handle.lock().await;
        Some(ctx.clone())
    }

    /// Number of known sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moc_protocol::System;

    #[tokio::test]
    async fn first_contact_creates_empty_context() {
        let store = SessionStore::new();
        assert!(store.snapshot("u1").await.is_none());

        let handle = store.get_or_create("u1").await;
        assert!(handle.lock().await.slots.system.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn same_id_returns_same_context() {
        let store = SessionStore::new();
        store.get_or_create("u1").await.lock().await.slots.system = Some(System::Apu);

        let ctx = store.snapshot("u1").await.unwrap();
        assert_eq!(ctx.slots.system, Some(System::Apu));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.get_or_create("a").await.lock().await.survey_answered = true;
        store.get_or_create("b").await;

        assert!(store.snapshot("a").await.unwrap().survey_answered);
        assert!(!store.snapshot("b").await.unwrap().survey_answered);
    }

    #[tokio::test]
    async fn save_replaces_context() {
        let store = SessionStore::new();
        let mut ctx = SessionContext::new();
        ctx.slots.tail_number = Some("CC-COP".into());
        store.save("u1", ctx).await;

        let saved = store.snapshot("u1").await.unwrap();
        assert_eq!(saved.slots.tail_number.as_deref(), Some("CC-COP"));
    }
}
