//! PostgreSQL implementation of MessageRepository and MediaRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use spaces_core::entities::{Media, Message};
use spaces_core::error::DomainError;
use spaces_core::traits::{MediaRepository, MessageQuery, MessageRepository, RepoResult};
use spaces_core::value_objects::{Snowflake, Visibility};

use crate::models::{MediaModel, MessageModel};

use super::error::{map_db_error, map_unique_violation};
use super::filters::LiveFilter;
use super::store::PgUnitOfWork;

#[async_trait]
impl MessageRepository for PgUnitOfWork {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn insert_message(&mut self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, channel_id, author_id, body, created_at, updated_at, deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.author_id.into_inner())
        .bind(&message.body)
        .bind(message.created_at)
        .bind(message.updated_at)
        .bind(message.deleted)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::Duplicate(format!("message {}", message.id)))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_message(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Message>> {
        let sql = format!(
            r#"
            SELECT m.id, m.channel_id, m.author_id, m.body, m.created_at, m.updated_at, m.deleted
            FROM messages m
            JOIN channels c ON c.id = m.channel_id
            JOIN spaces s ON s.id = c.space_id
            WHERE m.id = $1{}
            "#,
            LiveFilter::new(visibility).and_live(&["m", "c", "s"])
        );

        let result = sqlx::query_as::<_, MessageModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_messages_by_channel(
        &mut self,
        channel_id: Snowflake,
        query: MessageQuery,
        visibility: Visibility,
    ) -> RepoResult<Vec<Message>> {
        let sql = format!(
            r#"
            SELECT m.id, m.channel_id, m.author_id, m.body, m.created_at, m.updated_at, m.deleted
            FROM messages m
            JOIN channels c ON c.id = m.channel_id
            JOIN spaces s ON s.id = c.space_id
            WHERE m.channel_id = $1 AND ($2::BIGINT IS NULL OR m.id < $2){}
            ORDER BY m.id DESC
            LIMIT $3
            "#,
            LiveFilter::new(visibility).and_live(&["m", "c", "s"])
        );

        let results = sqlx::query_as::<_, MessageModel>(&sql)
            .bind(channel_id.into_inner())
            .bind(query.before.map(Snowflake::into_inner))
            .bind(query.limit)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update_message(&mut self, message: &Message) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET body = $2, updated_at = $3
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(message.id.into_inner())
        .bind(&message.body)
        .bind(message.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn soft_delete_message(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
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

#[async_trait]
impl MediaRepository for PgUnitOfWork {
    #[instrument(skip(self, media), fields(media_id = %media.id, message_id = %media.message_id))]
    async fn insert_media(&mut self, media: &Media) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO media (id, message_id, storage_ref, content_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(media.id.into_inner())
        .bind(media.message_id.into_inner())
        .bind(&media.storage_ref)
        .bind(&media.content_type)
        .bind(media.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::Duplicate(format!("media {}", media.id))))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_media_by_message(
        &mut self,
        message_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Media>> {
        let sql = format!(
            r#"
            SELECT md.id, md.message_id, md.storage_ref, md.content_type, md.created_at
            FROM media md
            JOIN messages m ON m.id = md.message_id
            JOIN channels c ON c.id = m.channel_id
            JOIN spaces s ON s.id = c.space_id
            WHERE md.message_id = $1{}
            ORDER BY md.id
            "#,
            LiveFilter::new(visibility).and_live(&["m", "c", "s"])
        );

        let results = sqlx::query_as::<_, MediaModel>(&sql)
            .bind(message_id.into_inner())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Media::from).collect())
    }
}
