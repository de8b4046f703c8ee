//! Domain entities - the core business objects.

mod identity;
mod post;
mod session;
mod user;

pub use identity::{CurrentUser, Identity};
pub use post::{Post, PostChanges};
pub use session::{DEFAULT_SESSION_TTL_SECS, Session, SessionPolicy};
pub use user::{User, mask_email};
