//! In-memory session store - the default when Redis is not configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use inkwell_core::domain::Session;
use inkwell_core::ports::{SessionError, SessionStore};

/// Inserts between opportunistic sweeps of expired sessions.
const SWEEP_EVERY_INSERTS: usize = 256;

/// Sessions in a `HashMap` keyed by token.
///
/// Expired entries are dropped lazily on lookup, in bulk by
/// [`SessionStore::purge_expired`], and every [`SWEEP_EVERY_INSERTS`] inserts,
/// so abandoned sessions are bounded even when no sweeper job runs. Sessions
/// do not survive a restart and are not shared between processes.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    inserts: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY_INSERTS == 0 {
            let before = sessions.len();
            let now = Utc::now();
            sessions.retain(|_, s| !s.is_expired_at(now));
            tracing::debug!(purged = before - sessions.len(), "Swept expired sessions on insert");
        }
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        let Some(session) = sessions.get(token) else {
            return Ok(None);
        };

        if session.is_expired() {
            drop(sessions);
            self.sessions.write().await.remove(token);
            return Ok(None);
        }

        Ok(Some(session.clone()))
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = InMemorySessionStore::new();
        let session = Session::new(Uuid::new_v4(), Duration::hours(1));

        store.insert(session.clone()).await.unwrap();
        assert_eq!(store.get(&session.token).await.unwrap(), Some(session.clone()));

        store.delete(&session.token).await.unwrap();
        assert_eq!(store.get(&session.token).await.unwrap(), None);
        // Deleting twice is fine.
        store.delete(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_is_not_returned() {
        let store = InMemorySessionStore::new();
        let session = Session::new(Uuid::new_v4(), Duration::seconds(-1));

        store.insert(session.clone()).await.unwrap();

        assert_eq!(store.get(&session.token).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_sessions() {
        let store = InMemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let live = Session::new(user_id, Duration::hours(1));
        store.insert(live.clone()).await.unwrap();
        store
            .insert(Session::new(user_id, Duration::seconds(-30)))
            .await
            .unwrap();
        store
            .insert(Session::new(user_id, Duration::seconds(-60)))
            .await
            .unwrap();

        let purged = store.purge_expired(Utc::now()).await.unwrap();

        assert_eq!(purged, 2);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&live.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_inserts_sweep_abandoned_sessions() {
        let store = InMemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let abandoned = Session::new(user_id, Duration::seconds(-1));
        store.insert(abandoned.clone()).await.unwrap();

        for _ in 1..SWEEP_EVERY_INSERTS {
            store
                .insert(Session::new(user_id, Duration::hours(1)))
                .await
                .unwrap();
        }

        // Never looked up, yet gone once the insert count reached the interval.
        assert!(!store.sessions.read().await.contains_key(&abandoned.token));
        assert_eq!(store.len().await, SWEEP_EVERY_INSERTS - 1);
    }
}
