//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory stores only
//! - `postgres` - PostgreSQL user/post repositories via SeaORM
//! - `rate-limit` - Keyed rate limiting via governor
//! - `redis` - Redis-backed session store

pub mod auth;
pub mod database;
pub mod memory;
pub mod session;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - always available
pub use auth::{Argon2Config, Argon2PasswordService};
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use session::InMemorySessionStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use session::{RedisConfig, RedisSessionStore};
