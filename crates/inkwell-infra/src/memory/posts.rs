use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Post, PostChanges};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository};

/// Post repository backed by a `HashMap` behind an async `RwLock`.
///
/// Conditional updates and deletes match and mutate under one write lock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).filter(|p| p.is_authored_by(author_id)).cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&id) {
            Some(post) if post.is_authored_by(author_id) => {
                post.apply(changes);
                Ok(Some(post.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let owned = posts.get(&id).is_some_and(|p| p.is_authored_by(author_id));
        Ok(if owned { posts.remove(&id) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(title: &str) -> PostChanges {
        PostChanges {
            title: title.to_string(),
            content: "edited".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let mut older = Post::new(author, "old".into(), "c".into());
        older.created_at = older.created_at - chrono::Duration::minutes(5);
        repo.insert(older).await.unwrap();
        repo.insert(Post::new(author, "new".into(), "c".into()))
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_conditional_update_and_delete_respect_author() {
        let repo = InMemoryPostRepository::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let post = repo
            .insert(Post::new(owner, "T".into(), "C".into()))
            .await
            .unwrap();

        assert!(repo.update_owned(post.id, intruder, changes("X")).await.unwrap().is_none());
        assert!(repo.delete_owned(post.id, intruder).await.unwrap().is_none());
        assert_eq!(repo.find_by_id(post.id).await.unwrap().unwrap().title, "T");

        let updated = repo.update_owned(post.id, owner, changes("T2")).await.unwrap().unwrap();
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.author_id, owner);

        assert!(repo.delete_owned(post.id, owner).await.unwrap().is_some());
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
    }
}
