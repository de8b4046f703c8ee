//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Keyed rate limiter, used to throttle credential endpoints per client.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one attempt for `key` and decide whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitDecision, RateLimitError>;

    /// Drop state for keys that no longer affect any decision. Called
    /// periodically by maintenance jobs; backends with self-expiring state
    /// need not override it.
    fn shrink(&self) {}
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid quota: {0}")]
    InvalidQuota(String),
}
