//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use tracing::instrument;

use spaces_core::entities::User;
use spaces_core::error::DomainError;
use spaces_core::traits::{RepoResult, UserRepository};
use spaces_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};
use super::store::PgUnitOfWork;

#[async_trait]
impl UserRepository for PgUnitOfWork {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, display_name, deactivated, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(user.deactivated)
        .bind(user.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::Duplicate(format!("username {}", user.username))
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user(&mut self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT id, username, display_name, deactivated, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }
}
