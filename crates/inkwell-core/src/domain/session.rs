use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of a login session.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// A login session. The token is the only thing the client ever holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user_id` that expires `ttl` from now.
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: generate_token(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Expiry is inclusive: a session is dead at `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Remaining lifetime, zero once expired.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }
}

/// Session lifetime policy. TTL is fixed from creation; activity does not extend it.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

// Two v4 UUIDs give 244 random bits from the OS generator.
fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expires_after_ttl() {
        let session = Session::new(Uuid::new_v4(), Duration::hours(1));

        assert_eq!(session.expires_at - session.created_at, Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(session.created_at + Duration::minutes(61)));
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let user_id = Uuid::new_v4();
        let a = Session::new(user_id, Duration::hours(1));
        let b = Session::new(user_id, Duration::hours(1));

        assert_ne!(a.token, b.token);
        assert_eq!(a.token.len(), 64);
        assert!(!a.token.contains(&user_id.simple().to_string()));
    }

    #[test]
    fn test_remaining_is_never_negative() {
        let session = Session::new(Uuid::new_v4(), Duration::seconds(-5));
        assert_eq!(session.remaining(), Duration::zero());
    }
}
