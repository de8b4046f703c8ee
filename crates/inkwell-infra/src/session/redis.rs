//! Redis session store. Shared between server instances; Redis expires keys itself.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use inkwell_core::domain::Session;
use inkwell_core::ports::{SessionError, SessionStore};

const KEY_PREFIX: &str = "inkwell:session:";

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Redis-backed session store.
///
/// Each session is a JSON value under `inkwell:session:<token>` with a key TTL
/// equal to the session's remaining lifetime.
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn new(config: &RedisConfig) -> Result<Self, SessionError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| SessionError::Connection("Connection timed out".to_string()))?
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis session store");

        Ok(Self { conn })
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }

    /// Key TTL in whole seconds, rounded up and never zero, so a freshly
    /// issued session always lands in Redis.
    fn key_ttl(session: &Session) -> u64 {
        let millis = u64::try_from(session.remaining().num_milliseconds()).unwrap_or(0);
        millis.div_ceil(1000).max(1)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        let ttl_secs = Self::key_ttl(&session);
        let value = serde_json::to_string(&session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(&session.token), value, ttl_secs)
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::key(token))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        let session = raw
            .map(|value| {
                serde_json::from_str::<Session>(&value)
                    .map_err(|e| SessionError::Serialization(e.to_string()))
            })
            .transpose()?;

        // A key may outlive its session by the sub-second rounding.
        Ok(session.filter(|s| !s.is_expired()))
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(token))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, SessionError> {
        // Key TTLs already evict expired sessions.
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;

    async fn get_test_store() -> Option<RedisSessionStore> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
        };

        RedisSessionStore::new(&config).await.ok()
    }

    #[test]
    fn test_key_ttl_is_never_zero() {
        let almost_gone = Session::new(Uuid::new_v4(), ChronoDuration::milliseconds(300));
        assert_eq!(RedisSessionStore::key_ttl(&almost_gone), 1);

        let expired = Session::new(Uuid::new_v4(), ChronoDuration::seconds(-5));
        assert_eq!(RedisSessionStore::key_ttl(&expired), 1);

        let fresh = Session::new(Uuid::new_v4(), ChronoDuration::minutes(5));
        let ttl = RedisSessionStore::key_ttl(&fresh);
        assert!((299..=300).contains(&ttl));
    }

    #[tokio::test]
    async fn test_redis_session_round_trip() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        let session = Session::new(Uuid::new_v4(), ChronoDuration::minutes(5));
        store.insert(session.clone()).await.unwrap();
        assert_eq!(store.get(&session.token).await.unwrap(), Some(session.clone()));

        store.delete(&session.token).await.unwrap();
        assert_eq!(store.get(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_skips_expired_sessions() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => return,
        };

        let session = Session::new(Uuid::new_v4(), ChronoDuration::seconds(-1));
        store.insert(session.clone()).await.unwrap();

        assert_eq!(store.get(&session.token).await.unwrap(), None);
    }
}
