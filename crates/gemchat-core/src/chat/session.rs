//! Session registry for browser chat sessions.
//!
//! Each session owns one [`Transcript`] behind an async mutex. A turn holds
//! the lock from submit until the assistant turn is appended, so turns of one
//! session run strictly one after another.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::transcript::Transcript;

/// Shared handle to one session's transcript.
pub type SessionHandle = Arc<Mutex<Transcript>>;

/// In-memory map from session id to transcript. Sessions live until the
/// process exits.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions.insert(id, SessionHandle::default());
        tracing::debug!(session_id = %id, "session created");
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Look up a session, creating an empty one under `id` if unknown.
    ///
    /// Lets a browser tab keep its id across a server restart.
    pub fn get_or_create(&self, id: Uuid) -> SessionHandle {
        Arc::clone(
            self.sessions
                .entry(id)
                .or_insert_with(|| {
                    tracing::debug!(session_id = %id, "session adopted");
                    SessionHandle::default()
                })
                .value(),
        )
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_types::chat::ChatTurn;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create();
        assert_eq!(store.len(), 1);

        let handle = store.get(&id).unwrap();
        assert!(handle.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create();
        let b = store.create();

        store
            .get(&a)
            .unwrap()
            .lock()
            .await
            .append(ChatTurn::user("only in a"));

        assert_eq!(store.get(&a).unwrap().lock().await.len(), 1);
        assert!(store.get(&b).unwrap().lock().await.is_empty());
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let store = SessionStore::new();
        assert!(store.get(&Uuid::now_v7()).is_none());
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing() {
        let store = SessionStore::new();
        let id = Uuid::now_v7();

        store
            .get_or_create(id)
            .lock()
            .await
            .append(ChatTurn::user("hi"));

        assert_eq!(store.get_or_create(id).lock().await.len(), 1);
        assert_eq!(store.len(), 1);
    }
}
