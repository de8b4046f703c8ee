//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;
mod session;

pub use auth::{AuthError, PasswordService};
pub use rate_limit::{RateLimitDecision, RateLimitError, RateLimiter};
pub use repository::{BaseRepository, PostRepository, UserRepository};
pub use session::{SessionError, SessionStore};
