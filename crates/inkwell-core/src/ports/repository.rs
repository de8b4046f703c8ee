use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges, User};
use crate::error::RepoError;

/// Generic repository trait shared by all document stores.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key clashes surface as [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their normalised email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Every method taking an `author_id` matches on `id AND author_id` in a
/// single store operation, so ownership is checked atomically with the
/// read or write it guards.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Returns the updated post, or `None` when nothing matched.
    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError>;

    /// Returns the deleted post, or `None` when nothing matched.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError>;
}
