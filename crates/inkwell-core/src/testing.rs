//! Test doubles for the ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostChanges, Session, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, PostRepository, SessionError, SessionStore,
    UserRepository,
};

/// Reversible "hash" so tests stay fast.
pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("fake${}", password.chars().rev().collect::<String>()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let digest = hash
            .strip_prefix("fake$")
            .ok_or_else(|| AuthError::MalformedHash(hash.to_string()))?;
        Ok(digest.chars().rev().collect::<String>() == password)
    }
}

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakePosts {
    posts: Mutex<Vec<Post>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.author_id == author_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author_id)
            .map(|p| {
                p.apply(changes);
                p.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let index = posts
            .iter()
            .position(|p| p.id == id && p.author_id == author_id);
        Ok(index.map(|i| posts.remove(i)))
    }
}

#[derive(Default)]
pub struct FakeSessions {
    sessions: Mutex<HashMap<String, Session>>,
    failing: bool,
}

impl FakeSessions {
    /// A store whose every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.failing {
            Err(SessionError::Connection("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        self.check()?;
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        self.check()?;
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        self.check()?;
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok(before - sessions.len())
    }
}
