//! Authorization guard.
//!
//! Each check takes an already-resolved [`Identity`] and either hands back the
//! acting user or an error the HTTP layer turns into a redirect:
//!
//! ```text
//! Anonymous --(valid token)--> Authenticated --(is_admin)--> Admin
//! ```

use crate::domain::{CurrentUser, Identity, Post};
use crate::error::DomainError;
use uuid::Uuid;

/// Pass any signed-in user.
pub fn require_authenticated(identity: &Identity) -> Result<&CurrentUser, DomainError> {
    identity.user().ok_or(DomainError::Authentication)
}

/// Pass signed-in users carrying the admin flag.
pub fn require_admin(identity: &Identity) -> Result<&CurrentUser, DomainError> {
    let user = require_authenticated(identity)?;
    if user.is_admin {
        Ok(user)
    } else {
        Err(DomainError::Authorization)
    }
}

/// Pass only the author of `post`.
///
/// A missing post and somebody else's post produce the same
/// [`DomainError::NotFound`], so callers cannot probe for other users' posts.
pub fn require_ownership<'a>(
    identity: &'a Identity,
    post_id: Uuid,
    post: Option<&Post>,
) -> Result<&'a CurrentUser, DomainError> {
    let user = require_authenticated(identity)?;
    match post {
        Some(post) if post.is_authored_by(user.id) => Ok(user),
        _ => Err(DomainError::post_not_found(post_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(is_admin: bool) -> Identity {
        Identity::Authenticated(CurrentUser {
            id: Uuid::new_v4(),
            email: "member@x.com".to_string(),
            is_admin,
        })
    }

    #[test]
    fn test_require_authenticated() {
        assert!(matches!(
            require_authenticated(&Identity::Anonymous),
            Err(DomainError::Authentication)
        ));
        assert!(require_authenticated(&member(false)).is_ok());
    }

    #[test]
    fn test_require_admin_denies_non_admin() {
        assert!(matches!(
            require_admin(&member(false)),
            Err(DomainError::Authorization)
        ));
        assert!(matches!(
            require_admin(&Identity::Anonymous),
            Err(DomainError::Authentication)
        ));
        assert!(require_admin(&member(true)).is_ok());
    }

    #[test]
    fn test_require_ownership_only_passes_author() {
        let alice = member(false);
        let bob = member(true);
        let post = Post::new(alice.user().unwrap().id, "T".into(), "C".into());

        assert!(require_ownership(&alice, post.id, Some(&post)).is_ok());
        // Admin rights do not extend to other users' posts.
        assert!(matches!(
            require_ownership(&bob, post.id, Some(&post)),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            require_ownership(&Identity::Anonymous, post.id, Some(&post)),
            Err(DomainError::Authentication)
        ));
    }

    #[test]
    fn test_missing_and_foreign_posts_look_the_same() {
        let alice = member(false);
        let bob = member(false);
        let post = Post::new(alice.user().unwrap().id, "T".into(), "C".into());

        let foreign = require_ownership(&bob, post.id, Some(&post)).unwrap_err();
        let missing = require_ownership(&bob, post.id, None).unwrap_err();

        assert_eq!(foreign.to_string(), missing.to_string());
    }
}
