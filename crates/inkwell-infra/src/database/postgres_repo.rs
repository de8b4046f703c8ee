//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use inkwell_core::domain::{Post, PostChanges, User, mask_email};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

impl PostgresPostRepository {
    fn owned(id: Uuid, author_id: Uuid) -> sea_orm::Condition {
        sea_orm::Condition::all()
            .add(post::Column::Id.eq(id))
            .add(post::Column::AuthorId.eq(author_id))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(Self::owned(id, author_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        // UPDATE posts SET ... WHERE id = $1 AND author_id = $2
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(changes.title))
            .col_expr(post::Column::Content, Expr::value(changes.content))
            .col_expr(
                post::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(Self::owned(id, author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_owned(id, author_id).await
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(existing) = self.find_owned(id, author_id).await? else {
            return Ok(None);
        };

        // The delete carries the author filter itself; the read above only
        // supplies the return value.
        let result = PostEntity::delete_many()
            .filter(Self::owned(id, author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((result.rows_affected > 0).then_some(existing))
    }
}
