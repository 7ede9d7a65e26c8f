//! Query layer
//!
//! Composed reads. Default reads hide soft-deleted rows in every table they
//! touch; the `_including_deleted` variants are for audit tooling.

use tracing::instrument;
use validator::Validate;

use spaces_core::entities::{Channel, ChannelWithSpace, Media, Message, SpaceWithRelated};
use spaces_core::traits::MessageQuery;
use spaces_core::{DomainError, Snowflake, Visibility};

use crate::dto::MessagePageQuery;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Query service
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Channel joined to its space
    ///
    /// Only the channel's deleted flag is filtered. The space comes back even
    /// when it has been soft-deleted; check [`ChannelWithSpace::space_is_live`].
    #[instrument(skip(self))]
    pub async fn fetch_channel_with_space(&self, channel_id: Snowflake) -> ServiceResult<ChannelWithSpace> {
        self.channel_with_space(channel_id, Visibility::Live).await
    }

    /// Like [`Self::fetch_channel_with_space`], but also finds deleted channels
    #[instrument(skip(self))]
    pub async fn fetch_channel_with_space_including_deleted(
        &self,
        channel_id: Snowflake,
    ) -> ServiceResult<ChannelWithSpace> {
        self.channel_with_space(channel_id, Visibility::IncludeDeleted).await
    }

    async fn channel_with_space(
        &self,
        channel_id: Snowflake,
        visibility: Visibility,
    ) -> ServiceResult<ChannelWithSpace> {
        let mut uow = self.ctx.begin().await?;
        let joined = uow
            .find_channel_with_space(channel_id, visibility)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;

        Ok(joined)
    }

    /// Live channels of a live space
    #[instrument(skip(self))]
    pub async fn channels_in_space(&self, space_id: Snowflake) -> ServiceResult<Vec<Channel>> {
        let mut uow = self.ctx.begin().await?;
        uow.find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;

        Ok(uow.find_channels_by_space(space_id, Visibility::Live).await?)
    }

    /// A live space with its members and live channels
    #[instrument(skip(self))]
    pub async fn space_with_related(&self, space_id: Snowflake) -> ServiceResult<SpaceWithRelated> {
        let mut uow = self.ctx.begin().await?;
        let space = uow
            .find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;
        let members = uow.find_space_members(space_id).await?;
        let channels = uow.find_channels_by_space(space_id, Visibility::Live).await?;

        Ok(SpaceWithRelated {
            space,
            members,
            channels,
        })
    }

    #[instrument(skip(self))]
    pub async fn message(&self, message_id: Snowflake) -> ServiceResult<Message> {
        self.find_message(message_id, Visibility::Live).await
    }

    #[instrument(skip(self))]
    pub async fn message_including_deleted(&self, message_id: Snowflake) -> ServiceResult<Message> {
        self.find_message(message_id, Visibility::IncludeDeleted).await
    }

    async fn find_message(&self, message_id: Snowflake, visibility: Visibility) -> ServiceResult<Message> {
        let mut uow = self.ctx.begin().await?;
        let message = uow
            .find_message(message_id, visibility)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        Ok(message)
    }

    /// Newest-first page of a channel's live messages
    ///
    /// NotFound when the channel or its space is deleted.
    #[instrument(skip(self))]
    pub async fn messages_in_channel(
        &self,
        channel_id: Snowflake,
        page: MessagePageQuery,
    ) -> ServiceResult<Vec<Message>> {
        page.validate()?;

        let mut uow = self.ctx.begin().await?;
        let joined = uow
            .find_channel_with_space(channel_id, Visibility::Live)
            .await?
            .filter(ChannelWithSpace::space_is_live)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;

        let query = MessageQuery {
            before: page.before,
            limit: page.limit,
        };
        Ok(uow
            .find_messages_by_channel(joined.channel.id, query, Visibility::Live)
            .await?)
    }

    /// Media of a live message
    #[instrument(skip(self))]
    pub async fn media_for_message(&self, message_id: Snowflake) -> ServiceResult<Vec<Media>> {
        self.media(message_id, Visibility::Live).await
    }

    /// Media of a message, deleted or not
    #[instrument(skip(self))]
    pub async fn media_for_message_including_deleted(
        &self,
        message_id: Snowflake,
    ) -> ServiceResult<Vec<Media>> {
        self.media(message_id, Visibility::IncludeDeleted).await
    }

    async fn media(&self, message_id: Snowflake, visibility: Visibility) -> ServiceResult<Vec<Media>> {
        let mut uow = self.ctx.begin().await?;
        uow.find_message(message_id, visibility)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        Ok(uow.find_media_by_message(message_id, visibility).await?)
    }
}
