//! Content service
//!
//! Creates, edits and soft-deletes spaces, channels and messages, and
//! attaches media. Posting and editing run their membership and restraint
//! checks in the same transaction as the write, under the author's user lock.

use std::fmt;

use tracing::{info, instrument, warn};
use validator::Validate;

use spaces_core::entities::{Channel, Media, Message, Space, SpaceMember};
use spaces_core::{DomainError, PolicyViolation, Snowflake, SpaceRole, UnitOfWork, Visibility};

use crate::dto::{
    AttachMediaRequest, CreateChannelRequest, CreateSpaceRequest, EditMessageRequest,
    PostMessageRequest, RenameChannelRequest, RenameSpaceRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::membership::evaluate_posting;

/// Soft-deletable content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Space,
    Channel,
    Message,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Space => "space",
            Self::Channel => "channel",
            Self::Message => "message",
        })
    }
}

/// Content service
pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    /// Create a new ContentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a space; the owner joins it with the owner role
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_space(
        &self,
        owner_id: Snowflake,
        request: CreateSpaceRequest,
    ) -> ServiceResult<Space> {
        request.validate()?;

        let now = self.ctx.now();
        let space = Space::new(
            self.ctx.generate_id(),
            request.name,
            request.description.unwrap_or_default(),
            owner_id,
            now,
        );

        let mut uow = self.ctx.begin().await?;
        uow.find_user(owner_id)
            .await?
            .ok_or(DomainError::UserNotFound(owner_id))?;
        uow.insert_space(&space).await?;
        uow.insert_space_member(&SpaceMember::new(space.id, owner_id, SpaceRole::Owner, now))
            .await?;
        uow.commit().await?;

        info!(space_id = %space.id, owner_id = %owner_id, "Space created");
        Ok(space)
    }

    /// Create a channel in a live space
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_channel(
        &self,
        space_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<Channel> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        uow.find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;

        let channel = Channel::new(self.ctx.generate_id(), space_id, request.name, self.ctx.now());
        uow.insert_channel(&channel).await?;
        uow.commit().await?;

        info!(channel_id = %channel.id, space_id = %space_id, "Channel created");
        Ok(channel)
    }

    /// Mark content deleted
    ///
    /// Idempotent: deleting twice succeeds. Only an id that never existed is
    /// NotFound. Nothing cascades; children are hidden by read filters.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, kind: ContentKind, id: Snowflake) -> ServiceResult<()> {
        let mut uow = self.ctx.begin().await?;
        let now = self.ctx.now();

        let (found, missing) = match kind {
            ContentKind::Space => (uow.soft_delete_space(id, now).await?, DomainError::SpaceNotFound(id)),
            ContentKind::Channel => {
                (uow.soft_delete_channel(id, now).await?, DomainError::ChannelNotFound(id))
            }
            ContentKind::Message => {
                (uow.soft_delete_message(id, now).await?, DomainError::MessageNotFound(id))
            }
        };
        if !found {
            return Err(missing.into());
        }
        uow.commit().await?;

        info!(kind = %kind, id = %id, "Content soft-deleted");
        Ok(())
    }

    /// Post a message
    ///
    /// Fails with NotFound for an absent or deleted channel, and with a
    /// policy violation when the author may not post there.
    #[instrument(skip(self, request))]
    pub async fn post_message(
        &self,
        channel_id: Snowflake,
        author_id: Snowflake,
        request: PostMessageRequest,
    ) -> ServiceResult<Message> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        // A concurrent restrain for this author waits until we commit
        uow.lock_user(author_id).await?;

        let now = self.ctx.now();
        let verdict = evaluate_posting(uow.as_mut(), self.ctx.moderation(), channel_id, author_id, now)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        if let Err(violation) = verdict {
            warn!(channel_id = %channel_id, author_id = %author_id, reason = %violation, "Post refused");
            return Err(DomainError::from(violation).into());
        }

        let message = Message::new(self.ctx.generate_id(), channel_id, author_id, request.body, now);
        uow.insert_message(&message).await?;
        uow.commit().await?;

        info!(message_id = %message.id, channel_id = %channel_id, "Message posted");
        Ok(message)
    }

    /// Rename a live space; admins and the owner only
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn rename_space(
        &self,
        actor_id: Snowflake,
        space_id: Snowflake,
        request: RenameSpaceRequest,
    ) -> ServiceResult<Space> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        let mut space = uow
            .find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;
        require_moderator(uow.as_mut(), space_id, actor_id).await?;

        space.name = request.name;
        if let Some(description) = request.description {
            space.description = description;
        }
        space.updated_at = self.ctx.now();
        if !uow.update_space(&space).await? {
            return Err(DomainError::SpaceNotFound(space_id).into());
        }
        uow.commit().await?;

        info!(space_id = %space_id, actor_id = %actor_id, "Space renamed");
        Ok(space)
    }

    /// Rename a live channel of a live space; admins and the owner only
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn rename_channel(
        &self,
        actor_id: Snowflake,
        channel_id: Snowflake,
        request: RenameChannelRequest,
    ) -> ServiceResult<Channel> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        let joined = uow
            .find_channel_with_space(channel_id, Visibility::Live)
            .await?
            .filter(|j| j.space_is_live())
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        require_moderator(uow.as_mut(), joined.space.id, actor_id).await?;

        let mut channel = joined.channel;
        channel.name = request.name;
        channel.updated_at = self.ctx.now();
        if !uow.update_channel(&channel).await? {
            return Err(DomainError::ChannelNotFound(channel_id).into());
        }
        uow.commit().await?;

        info!(channel_id = %channel_id, actor_id = %actor_id, "Channel renamed");
        Ok(channel)
    }

    /// Edit a live message
    ///
    /// Only the author may edit, and only while still allowed to post in the
    /// message's channel.
    #[instrument(skip(self, request))]
    pub async fn edit_message(
        &self,
        actor_id: Snowflake,
        message_id: Snowflake,
        request: EditMessageRequest,
    ) -> ServiceResult<Message> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        uow.lock_user(actor_id).await?;

        let mut message = uow
            .find_message(message_id, Visibility::Live)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;
        if !message.is_author(actor_id) {
            warn!(message_id = %message_id, actor_id = %actor_id, "Edit refused");
            return Err(DomainError::from(PolicyViolation::NotAuthor).into());
        }

        let now = self.ctx.now();
        let verdict = evaluate_posting(uow.as_mut(), self.ctx.moderation(), message.channel_id, actor_id, now)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;
        if let Err(violation) = verdict {
            warn!(message_id = %message_id, actor_id = %actor_id, reason = %violation, "Edit refused");
            return Err(DomainError::from(violation).into());
        }

        message.edit(request.body, now);
        if !uow.update_message(&message).await? {
            return Err(DomainError::MessageNotFound(message_id).into());
        }
        uow.commit().await?;

        info!(message_id = %message_id, "Message edited");
        Ok(message)
    }

    /// Attach media to a live message
    ///
    /// NotFound when the message, its channel or its space is deleted.
    #[instrument(skip(self, request))]
    pub async fn attach_media(
        &self,
        message_id: Snowflake,
        request: AttachMediaRequest,
    ) -> ServiceResult<Media> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        uow.find_message(message_id, Visibility::Live)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let media = Media::new(
            self.ctx.generate_id(),
            message_id,
            request.storage_ref,
            request.content_type,
            self.ctx.now(),
        );
        uow.insert_media(&media).await?;
        uow.commit().await?;

        info!(media_id = %media.id, message_id = %message_id, "Media attached");
        Ok(media)
    }

    /// Delete a message on behalf of `actor_id`
    ///
    /// Allowed for the author and for admins or the owner of the message's space.
    #[instrument(skip(self))]
    pub async fn delete_message_as(&self, actor_id: Snowflake, message_id: Snowflake) -> ServiceResult<()> {
        let mut uow = self.ctx.begin().await?;

        let message = uow
            .find_message(message_id, Visibility::Live)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_author(actor_id) {
            let channel = uow
                .find_channel(message.channel_id, Visibility::IncludeDeleted)
                .await?
                .ok_or(DomainError::ChannelNotFound(message.channel_id))?;
            let moderator = uow
                .find_space_member(channel.space_id, actor_id)
                .await?
                .is_some_and(|m| m.can_moderate());

            if !moderator {
                warn!(message_id = %message_id, actor_id = %actor_id, "Delete refused");
                return Err(DomainError::from(PolicyViolation::NotAuthorOrModerator).into());
            }
        }

        uow.soft_delete_message(message_id, self.ctx.now()).await?;
        uow.commit().await?;

        info!(message_id = %message_id, actor_id = %actor_id, "Message deleted");
        Ok(())
    }
}

/// Policy violation unless `user_id` is an admin or the owner of the space
async fn require_moderator(
    uow: &mut dyn UnitOfWork,
    space_id: Snowflake,
    user_id: Snowflake,
) -> ServiceResult<()> {
    let moderator = uow
        .find_space_member(space_id, user_id)
        .await?
        .is_some_and(|m| m.can_moderate());
    if !moderator {
        warn!(space_id = %space_id, user_id = %user_id, "Moderator action refused");
        return Err(DomainError::from(PolicyViolation::NotSpaceModerator { space_id }).into());
    }
    Ok(())
}
