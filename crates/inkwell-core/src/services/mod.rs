//! Services - use cases built on top of the ports.

mod auth;
pub mod guard;
mod posts;

pub use auth::AuthService;
pub use guard::{require_admin, require_authenticated, require_ownership};
pub use posts::PostService;
