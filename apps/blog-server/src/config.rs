//! Application configuration loaded from environment variables.

use std::env;

use inkwell_core::domain::DEFAULT_SESSION_TTL_SECS;

#[cfg(feature = "postgres")]
use inkwell_infra::DatabaseConfig;
#[cfg(feature = "rate-limit")]
use inkwell_infra::RateLimitConfig;
#[cfg(feature = "redis")]
use inkwell_infra::RedisConfig;

/// Where sessions live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis,
}

/// Session and cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub ttl_secs: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_name: "inkwell_session".to_string(),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: match env::var("SESSION_STORE").map(|v| v.to_lowercase()) {
                Ok(v) if v == "redis" => SessionBackend::Redis,
                _ => SessionBackend::Memory,
            },
            ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &i64| *secs > 0)
                .unwrap_or(defaults.ttl_secs),
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_secure: env_flag("SESSION_COOKIE_SECURE", defaults.cookie_secure),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    /// Honour the `isAdmin` checkbox on the registration form.
    pub admin_signup_enabled: bool,
    /// Trust `Forwarded` / `X-Forwarded-For` for the client address.
    pub trust_proxy_headers: bool,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
    #[cfg(feature = "rate-limit")]
    pub login_rate_limit: Option<RateLimitConfig>,
    pub session_sweep_cron: String,
    pub scheduler_enabled: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            session: SessionConfig::from_env(),
            admin_signup_enabled: env_flag("ADMIN_SIGNUP_ENABLED", false),
            trust_proxy_headers: env_flag("TRUST_PROXY_HEADERS", false),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            login_rate_limit: env_flag("LOGIN_RATE_LIMIT_ENABLED", true)
                .then(RateLimitConfig::from_env),
            session_sweep_cron: env::var("SESSION_SWEEP_CRON")
                .unwrap_or_else(|_| "0 */10 * * * *".to_string()),
            scheduler_enabled: env_flag("SCHEDULER_ENABLED", true),
        }
    }
}

/// Parse a boolean toggle. Unrecognised values keep the default.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name).map(|v| v.to_lowercase()) {
        Ok(v) if matches!(v.as_str(), "1" | "true" | "yes") => true,
        Ok(v) if matches!(v.as_str(), "0" | "false" | "no") => false,
        _ => default,
    }
}
