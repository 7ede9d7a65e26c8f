//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use tracing::instrument;

use spaces_core::entities::{ChannelMember, SpaceMember};
use spaces_core::error::DomainError;
use spaces_core::traits::{MemberRepository, RepoResult};
use spaces_core::value_objects::{Snowflake, SpaceRole};

use crate::models::{ChannelMemberModel, SpaceMemberModel};

use super::error::{map_db_error, map_unique_violation};
use super::store::PgUnitOfWork;

#[async_trait]
impl MemberRepository for PgUnitOfWork {
    #[instrument(skip(self, member), fields(space_id = %member.space_id, user_id = %member.user_id))]
    async fn insert_space_member(&mut self, member: &SpaceMember) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO space_members (space_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.space_id.into_inner())
        .bind(member.user_id.into_inner())
        .bind(member.role.as_str())
        .bind(member.joined_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::AlreadySpaceMember {
                space_id: member.space_id,
                user_id: member.user_id,
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_space_member(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<SpaceMember>> {
        let result = sqlx::query_as::<_, SpaceMemberModel>(
            r#"
            SELECT space_id, user_id, role, joined_at
            FROM space_members
            WHERE space_id = $1 AND user_id = $2
            "#,
        )
        .bind(space_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(SpaceMember::from))
    }

    #[instrument(skip(self))]
    async fn find_space_members(&mut self, space_id: Snowflake) -> RepoResult<Vec<SpaceMember>> {
        let results = sqlx::query_as::<_, SpaceMemberModel>(
            r#"
            SELECT space_id, user_id, role, joined_at
            FROM space_members
            WHERE space_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(space_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(SpaceMember::from).collect())
    }

    #[instrument(skip(self))]
    async fn update_space_role(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
        role: SpaceRole,
    ) -> RepoResult<Option<SpaceMember>> {
        let result = sqlx::query_as::<_, SpaceMemberModel>(
            r#"
            UPDATE space_members
            SET role = $3
            WHERE space_id = $1 AND user_id = $2
            RETURNING space_id, user_id, role, joined_at
            "#,
        )
        .bind(space_id.into_inner())
        .bind(user_id.into_inner())
        .bind(role.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(SpaceMember::from))
    }

    #[instrument(skip(self))]
    async fn delete_space_member(&mut self, space_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM space_members
            WHERE space_id = $1 AND user_id = $2
            "#,
        )
        .bind(space_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, member), fields(channel_id = %member.channel_id, user_id = %member.user_id))]
    async fn insert_channel_member(&mut self, member: &ChannelMember) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_members (channel_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(member.channel_id.into_inner())
        .bind(member.user_id.into_inner())
        .bind(member.joined_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::AlreadyChannelMember {
                channel_id: member.channel_id,
                user_id: member.user_id,
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_channel_member(
        &mut self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChannelMember>> {
        let result = sqlx::query_as::<_, ChannelMemberModel>(
            r#"
            SELECT channel_id, user_id, joined_at
            FROM channel_members
            WHERE channel_id = $1 AND user_id = $2
            "#,
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChannelMember::from))
    }

    #[instrument(skip(self))]
    async fn find_channel_members(&mut self, channel_id: Snowflake) -> RepoResult<Vec<ChannelMember>> {
        let results = sqlx::query_as::<_, ChannelMemberModel>(
            r#"
            SELECT channel_id, user_id, joined_at
            FROM channel_members
            WHERE channel_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(channel_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChannelMember::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_channel_member(&mut self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM channel_members
            WHERE channel_id = $1 AND user_id = $2
            "#,
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_channel_members_in_space(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM channel_members cm
            USING channels c
            WHERE cm.channel_id = c.id AND c.space_id = $1 AND cm.user_id = $2
            "#,
        )
        .bind(space_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
