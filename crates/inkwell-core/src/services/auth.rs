//! Credential verification and session resolution.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Identity, Session, SessionPolicy, User, mask_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, SessionStore, UserRepository};

/// Registers users, logs them in and turns session tokens back into identities.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    passwords: Arc<dyn PasswordService>,
    policy: SessionPolicy,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        passwords: Arc<dyn PasswordService>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            users,
            sessions,
            passwords,
            policy,
        }
    }

    /// Create a new account.
    ///
    /// The email is stored trimmed and lower-cased; the password only ever
    /// as an Argon2 digest.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User, DomainError> {
        let email = User::normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(email, password_hash, is_admin);
        let saved = self.users.insert(user).await.map_err(|e| match e {
            // Lost a registration race against the same email.
            RepoError::Constraint(_) => {
                DomainError::Duplicate("Email already registered".to_string())
            }
            other => DomainError::Store(other),
        })?;

        tracing::info!(
            user_id = %saved.id,
            user_email = %mask_email(&saved.email),
            is_admin = saved.is_admin,
            "User registered"
        );
        Ok(saved)
    }

    /// Check credentials and open a session.
    ///
    /// Unknown identifiers and wrong passwords both yield
    /// [`DomainError::Authentication`] after one KDF evaluation each.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session, DomainError> {
        let email = User::normalize_email(identifier);

        let Some(user) = self.users.find_by_email(&email).await? else {
            // Burn the same work a real verification would cost.
            let _ = self.passwords.hash(password);
            tracing::debug!(user_email = %mask_email(&email), "Login failed");
            return Err(DomainError::Authentication);
        };

        if !self.verify_password(&user.password_hash, password) {
            tracing::debug!(user_email = %mask_email(&email), "Login failed");
            return Err(DomainError::Authentication);
        }

        let session = Session::new(user.id, self.policy.ttl);
        self.sessions.insert(session.clone()).await?;

        tracing::info!(user_id = %user.id, "Session opened");
        Ok(session)
    }

    /// Verify a raw password against a stored digest. Malformed digests never match.
    pub fn verify_password(&self, hash: &str, password: &str) -> bool {
        match self.passwords.verify(password, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Password verification failed");
                false
            }
        }
    }

    /// Resolve a session token to an identity.
    ///
    /// Never fails. Absent, unknown or expired tokens, sessions whose user
    /// no longer exists, and store failures all resolve to anonymous.
    pub async fn resolve_session(&self, token: Option<&str>) -> Identity {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Identity::Anonymous;
        };

        let session = match self.sessions.get(token).await {
            Ok(Some(session)) => session,
            Ok(None) => return Identity::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating request as anonymous");
                return Identity::Anonymous;
            }
        };

        if session.is_expired_at(Utc::now()) {
            if let Err(e) = self.sessions.delete(token).await {
                tracing::debug!(error = %e, "Failed to evict expired session");
            }
            return Identity::Anonymous;
        }

        match self.users.find_by_id(session.user_id).await {
            Ok(Some(user)) => Identity::from(user),
            Ok(None) => {
                tracing::warn!(user_id = %session.user_id, "Session refers to a missing user");
                Identity::Anonymous
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed, treating request as anonymous");
                Identity::Anonymous
            }
        }
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        self.sessions.delete(token).await?;
        Ok(())
    }

    /// Remove expired sessions from the store.
    pub async fn purge_expired_sessions(&self) -> Result<usize, DomainError> {
        let purged = self.sessions.purge_expired(Utc::now()).await?;
        if purged > 0 {
            tracing::info!(purged, "Expired sessions purged");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePasswords, FakeSessions, FakeUsers};
    use chrono::Duration;

    fn service() -> (AuthService, Arc<FakeSessions>) {
        let sessions = Arc::new(FakeSessions::default());
        let service = AuthService::new(
            Arc::new(FakeUsers::default()),
            sessions.clone(),
            Arc::new(FakePasswords),
            SessionPolicy::default(),
        );
        (service, sessions)
    }

    #[tokio::test]
    async fn test_register_then_login_resolves_identity() {
        let (auth, _) = service();

        let user = auth.register("u1@x.com", "pw1", false).await.unwrap();
        let session = auth.login("u1@x.com", "pw1").await.unwrap();
        let identity = auth.resolve_session(Some(&session.token)).await;

        let current = identity.user().unwrap();
        assert_eq!(current.email, "u1@x.com");
        assert_eq!(current.id, user.id);
        assert!(!identity.is_admin());
    }

    #[tokio::test]
    async fn test_register_never_stores_plaintext() {
        let (auth, _) = service();

        let user = auth.register("u1@x.com", "pw1", false).await.unwrap();

        assert_ne!(user.password_hash, "pw1");
        assert!(auth.verify_password(&user.password_hash, "pw1"));
        assert!(!auth.verify_password(&user.password_hash, "pw2"));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let (auth, _) = service();

        let user = auth.register("  U1@X.com ", "pw1", true).await.unwrap();

        assert_eq!(user.email, "u1@x.com");
        assert!(user.is_admin);
        assert!(auth.login("u1@x.COM", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (auth, _) = service();
        auth.register("u1@x.com", "pw1", false).await.unwrap();

        let result = auth.register("U1@x.com", "other", false).await;

        assert!(matches!(result, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let (auth, _) = service();

        assert!(matches!(
            auth.register("", "pw", false).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            auth.register("u@x.com", "", false).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            auth.register("not-an-email", "pw", false).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _) = service();
        auth.register("u1@x.com", "pw1", false).await.unwrap();

        let wrong_password = auth.login("u1@x.com", "nope").await.unwrap_err();
        let unknown_user = auth.login("ghost@x.com", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::Authentication));
        assert!(matches!(unknown_user, DomainError::Authentication));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_resolve_missing_or_unknown_token_is_anonymous() {
        let (auth, _) = service();

        assert_eq!(auth.resolve_session(None).await, Identity::Anonymous);
        assert_eq!(auth.resolve_session(Some("")).await, Identity::Anonymous);
        assert_eq!(
            auth.resolve_session(Some("no-such-token")).await,
            Identity::Anonymous
        );
    }

    #[tokio::test]
    async fn test_resolve_expired_session_is_anonymous_and_evicted() {
        let (auth, sessions) = service();
        let user = auth.register("u1@x.com", "pw1", false).await.unwrap();

        let expired = Session::new(user.id, Duration::seconds(-1));
        sessions.insert(expired.clone()).await.unwrap();

        assert_eq!(
            auth.resolve_session(Some(&expired.token)).await,
            Identity::Anonymous
        );
        assert!(sessions.get(&expired.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_with_failing_store_is_anonymous() {
        let sessions = Arc::new(FakeSessions::failing());
        let auth = AuthService::new(
            Arc::new(FakeUsers::default()),
            sessions,
            Arc::new(FakePasswords),
            SessionPolicy::default(),
        );

        assert_eq!(auth.resolve_session(Some("tok")).await, Identity::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (auth, _) = service();
        auth.register("u1@x.com", "pw1", false).await.unwrap();
        let session = auth.login("u1@x.com", "pw1").await.unwrap();

        auth.logout(&session.token).await.unwrap();

        assert_eq!(
            auth.resolve_session(Some(&session.token)).await,
            Identity::Anonymous
        );
    }

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let (auth, sessions) = service();
        let user_id = uuid::Uuid::new_v4();
        sessions
            .insert(Session::new(user_id, Duration::seconds(-10)))
            .await
            .unwrap();
        sessions
            .insert(Session::new(user_id, Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(auth.purge_expired_sessions().await.unwrap(), 1);
    }
}
