//! Post publishing with author-scoped edits.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CurrentUser, Post, PostChanges};
use crate::error::DomainError;
use crate::ports::PostRepository;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Publish a post as `author`.
    pub async fn compose(
        &self,
        author: &CurrentUser,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let changes = validate(title, content)?;
        let post = Post::new(author.id, changes.title, changes.content);
        let saved = self.posts.insert(post).await?;

        tracing::info!(post_id = %saved.id, author_id = %author.id, "Post composed");
        Ok(saved)
    }

    /// Load a post for editing. Missing and foreign posts are both `NotFound`.
    pub async fn find_owned(&self, author: &CurrentUser, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_owned(id, author.id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Replace title and content, matching on id and author in one store call.
    pub async fn update_owned(
        &self,
        author: &CurrentUser,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let changes = validate(title, content)?;
        match self.posts.update_owned(id, author.id, changes).await? {
            Some(post) => {
                tracing::info!(post_id = %id, author_id = %author.id, "Post updated");
                Ok(post)
            }
            None => {
                tracing::debug!(post_id = %id, user_id = %author.id, "Update matched no owned post");
                Err(DomainError::post_not_found(id))
            }
        }
    }

    pub async fn delete_owned(&self, author: &CurrentUser, id: Uuid) -> Result<Post, DomainError> {
        match self.posts.delete_owned(id, author.id).await? {
            Some(post) => {
                tracing::info!(post_id = %id, author_id = %author.id, "Post deleted");
                Ok(post)
            }
            None => {
                tracing::debug!(post_id = %id, user_id = %author.id, "Delete matched no owned post");
                Err(DomainError::post_not_found(id))
            }
        }
    }
}

fn validate(title: &str, content: &str) -> Result<PostChanges, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Title must not be empty".to_string()));
    }
    Ok(PostChanges {
        title: title.to_string(),
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePosts;

    fn user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "author@x.com".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_compose_sets_author_to_current_user() {
        let service = PostService::new(Arc::new(FakePosts::default()));
        let author = user();

        let post = service.compose(&author, "T", "C").await.unwrap();

        assert_eq!(post.author_id, author.id);
        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "T");
    }

    #[tokio::test]
    async fn test_compose_rejects_blank_title() {
        let service = PostService::new(Arc::new(FakePosts::default()));

        let result = service.compose(&user(), "   ", "C").await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_other_user_cannot_update_or_delete() {
        let service = PostService::new(Arc::new(FakePosts::default()));
        let alice = user();
        let bob = user();
        let post = service.compose(&alice, "T", "C").await.unwrap();

        assert!(matches!(
            service.update_owned(&bob, post.id, "X", "Y").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_owned(&bob, post.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.find_owned(&bob, post.id).await,
            Err(DomainError::NotFound { .. })
        ));

        let unchanged = service.get(post.id).await.unwrap();
        assert_eq!(unchanged.title, "T");
        assert_eq!(unchanged.content, "C");
    }

    #[tokio::test]
    async fn test_author_can_update_then_delete() {
        let service = PostService::new(Arc::new(FakePosts::default()));
        let alice = user();
        let post = service.compose(&alice, "T", "C").await.unwrap();

        let updated = service.update_owned(&alice, post.id, "T2", "C2").await.unwrap();
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.author_id, alice.id);

        service.delete_owned(&alice, post.id).await.unwrap();
        assert!(matches!(
            service.get(post.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
