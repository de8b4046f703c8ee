//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::SessionError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// Login failed or no identity is attached to the request.
    /// Deliberately carries no detail about which check failed.
    #[error("Authentication required")]
    Authentication,

    #[error("Insufficient permissions")]
    Authorization,

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Store failure: {0}")]
    Store(#[from] RepoError),

    #[error("Session store failure: {0}")]
    Sessions(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
