//! Session store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Session;

/// Server-side session storage keyed by the opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a freshly created session.
    async fn insert(&self, session: Session) -> Result<(), SessionError>;

    /// Look up a session. Stores may return expired sessions that have not
    /// been evicted yet; callers must check expiry themselves.
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Remove a session. Removing an unknown token is not an error.
    async fn delete(&self, token: &str) -> Result<(), SessionError>;

    /// Drop every session expired at `now`, returning how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
