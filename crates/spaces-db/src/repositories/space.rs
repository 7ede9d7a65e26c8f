//! PostgreSQL implementation of SpaceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use spaces_core::entities::Space;
use spaces_core::error::DomainError;
use spaces_core::traits::{RepoResult, SpaceRepository};
use spaces_core::value_objects::{Snowflake, Visibility};

use crate::models::SpaceModel;

use super::error::{map_db_error, map_unique_violation};
use super::filters::LiveFilter;
use super::store::PgUnitOfWork;

#[async_trait]
impl SpaceRepository for PgUnitOfWork {
    #[instrument(skip(self, space), fields(space_id = %space.id))]
    async fn insert_space(&mut self, space: &Space) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO spaces (id, name, description, owner_id, deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(space.id.into_inner())
        .bind(&space.name)
        .bind(&space.description)
        .bind(space.owner_id.into_inner())
        .bind(space.deleted)
        .bind(space.created_at)
        .bind(space.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::Duplicate(format!("space {}", space.id))))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_space(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Space>> {
        let sql = format!(
            r#"
            SELECT s.id, s.name, s.description, s.owner_id, s.deleted, s.created_at, s.updated_at
            FROM spaces s
            WHERE s.id = $1{}
            "#,
            LiveFilter::new(visibility).and_live(&["s"])
        );

        let result = sqlx::query_as::<_, SpaceModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Space::from))
    }

    #[instrument(skip(self, space), fields(space_id = %space.id))]
    async fn update_space(&mut self, space: &Space) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE spaces
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(space.id.into_inner())
        .bind(&space.name)
        .bind(&space.description)
        .bind(space.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn soft_delete_space(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE spaces
            SET deleted = TRUE,
                updated_at = CASE WHEN deleted THEN updated_at ELSE $2 END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
