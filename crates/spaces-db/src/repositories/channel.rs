//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use spaces_core::entities::{Channel, ChannelWithSpace};
use spaces_core::error::DomainError;
use spaces_core::traits::{ChannelRepository, RepoResult};
use spaces_core::value_objects::{Snowflake, Visibility};

use crate::models::{ChannelModel, ChannelWithSpaceModel};

use super::error::{map_db_error, map_unique_violation};
use super::filters::LiveFilter;
use super::store::PgUnitOfWork;

#[async_trait]
impl ChannelRepository for PgUnitOfWork {
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn insert_channel(&mut self, channel: &Channel) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO channels (id, space_id, name, deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(channel.id.into_inner())
        .bind(channel.space_id.into_inner())
        .bind(&channel.name)
        .bind(channel.deleted)
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::Duplicate(format!("channel {}", channel.id)))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_channel(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Channel>> {
        let sql = format!(
            r#"
            SELECT c.id, c.space_id, c.name, c.deleted, c.created_at, c.updated_at
            FROM channels c
            WHERE c.id = $1{}
            "#,
            LiveFilter::new(visibility).and_live(&["c"])
        );

        let result = sqlx::query_as::<_, ChannelModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_channels_by_space(
        &mut self,
        space_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Channel>> {
        let sql = format!(
            r#"
            SELECT c.id, c.space_id, c.name, c.deleted, c.created_at, c.updated_at
            FROM channels c
            JOIN spaces s ON s.id = c.space_id
            WHERE c.space_id = $1{}
            ORDER BY c.id
            "#,
            LiveFilter::new(visibility).and_live(&["c", "s"])
        );

        let results = sqlx::query_as::<_, ChannelModel>(&sql)
            .bind(space_id.into_inner())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_channel_with_space(
        &mut self,
        id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Option<ChannelWithSpace>> {
        // Only the channel is filtered; callers inspect the space's state
        let sql = format!(
            r#"
            SELECT c.id, c.space_id, c.name, c.deleted, c.created_at, c.updated_at,
                   s.name AS space_name,
                   s.description AS space_description,
                   s.owner_id AS space_owner_id,
                   s.deleted AS space_deleted,
                   s.created_at AS space_created_at,
                   s.updated_at AS space_updated_at
            FROM channels c
            JOIN spaces s ON s.id = c.space_id
            WHERE c.id = $1{}
            "#,
            LiveFilter::new(visibility).and_live(&["c"])
        );

        let result = sqlx::query_as::<_, ChannelWithSpaceModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(ChannelWithSpace::from))
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn update_channel(&mut self, channel: &Channel) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE channels
            SET name = $2, updated_at = $3
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(channel.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn soft_delete_channel(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE channels
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
