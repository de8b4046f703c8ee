use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::User;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, UserRepository};

/// User repository backed by a `HashMap` behind an async `RwLock`.
///
/// Email uniqueness is enforced under the write lock, mirroring the unique
/// index on `users.email`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("u1@x.com".to_string(), "hash".to_string(), false);

        repo.insert(user.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(user.id).await.unwrap().unwrap().email, "u1@x.com");
        assert_eq!(repo.find_by_email("u1@x.com").await.unwrap().unwrap().id, user.id);
        assert!(repo.find_by_email("u2@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.insert(User::new("u1@x.com".to_string(), "a".to_string(), false))
            .await
            .unwrap();

        let result = repo
            .insert(User::new("u1@x.com".to_string(), "b".to_string(), true))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
