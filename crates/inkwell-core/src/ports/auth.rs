//! Credential hashing port.

/// One-way password hashing.
///
/// Implementations must use a slow, salted KDF and verify in constant time.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password into a self-describing digest string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a digest produced by [`PasswordService::hash`].
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Hashing failures. Never exposed to end users.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}
