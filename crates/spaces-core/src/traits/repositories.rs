//! Repository traits (ports) - define the interface for data access
//!
//! Every repository is implemented by a store transaction, so all methods
//! take `&mut self`. Reads of tables carrying a `deleted` flag take a
//! [`Visibility`]; the implementation must apply it to every such table the
//! read touches unless the method documents otherwise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Channel, ChannelMember, ChannelWithSpace, Media, Message, Restraint, Space, SpaceMember, User,
};
use crate::error::DomainError;
use crate::value_objects::{Scope, Snowflake, SpaceRole, Visibility};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send {
    async fn insert_user(&mut self, user: &User) -> RepoResult<()>;

    async fn find_user(&mut self, id: Snowflake) -> RepoResult<Option<User>>;
}

// ============================================================================
// Space Repository
// ============================================================================

#[async_trait]
pub trait SpaceRepository: Send {
    async fn insert_space(&mut self, space: &Space) -> RepoResult<()>;

    async fn find_space(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Space>>;

    /// Write name, description and `updated_at` of a live space
    ///
    /// Returns false when the space is absent or soft-deleted.
    async fn update_space(&mut self, space: &Space) -> RepoResult<bool>;

    /// Tombstone a space; returns false only when no such row exists
    ///
    /// `updated_at` moves to `at` on the first deletion only.
    async fn soft_delete_space(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send {
    async fn insert_channel(&mut self, channel: &Channel) -> RepoResult<()>;

    async fn find_channel(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Channel>>;

    /// Channels of a space; `visibility` applies to both the space and the channels
    async fn find_channels_by_space(
        &mut self,
        space_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Channel>>;

    /// Join a channel to its owning space
    ///
    /// `visibility` filters the channel only. The space is returned as
    /// stored, including when it has been soft-deleted.
    async fn find_channel_with_space(
        &mut self,
        id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Option<ChannelWithSpace>>;

    /// Write name and `updated_at` of a live channel
    async fn update_channel(&mut self, channel: &Channel) -> RepoResult<bool>;

    /// Tombstone a channel; returns false only when no such row exists
    async fn soft_delete_channel(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send {
    /// Insert a space membership; a duplicate pair is `AlreadySpaceMember`
    async fn insert_space_member(&mut self, member: &SpaceMember) -> RepoResult<()>;

    async fn find_space_member(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<SpaceMember>>;

    async fn find_space_members(&mut self, space_id: Snowflake) -> RepoResult<Vec<SpaceMember>>;

    /// Returns the updated member, or `None` when the pair does not exist
    async fn update_space_role(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
        role: SpaceRole,
    ) -> RepoResult<Option<SpaceMember>>;

    async fn delete_space_member(&mut self, space_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Insert a channel membership; a duplicate pair is `AlreadyChannelMember`
    async fn insert_channel_member(&mut self, member: &ChannelMember) -> RepoResult<()>;

    async fn find_channel_member(
        &mut self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChannelMember>>;

    async fn find_channel_members(&mut self, channel_id: Snowflake) -> RepoResult<Vec<ChannelMember>>;

    async fn delete_channel_member(&mut self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Drop a user's memberships in every channel of a space (deleted channels included)
    async fn delete_channel_members_in_space(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<u64>;
}

// ============================================================================
// Restraint Repository
// ============================================================================

#[async_trait]
pub trait RestraintRepository: Send {
    /// Insert or replace the restraint for `(scope, user)`
    async fn upsert_restraint(&mut self, restraint: &Restraint) -> RepoResult<()>;

    /// Stored restraint regardless of expiry; callers apply lazy expiry
    async fn find_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<Option<Restraint>>;

    async fn find_restraints_by_scope(&mut self, scope: Scope) -> RepoResult<Vec<Restraint>>;

    async fn delete_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<bool>;

    /// Compaction: hard-delete rows whose expiry is at or before `before`
    async fn delete_expired_restraints(&mut self, before: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for message queries
#[derive(Debug, Clone, Copy)]
pub struct MessageQuery {
    /// Only messages with an id lower than this
    pub before: Option<Snowflake>,
    pub limit: i64,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            before: None,
            limit: 50,
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send {
    async fn insert_message(&mut self, message: &Message) -> RepoResult<()>;

    /// `visibility` applies to the message, its channel and the channel's space
    async fn find_message(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Message>>;

    /// Newest first; `visibility` applies to the messages, their channel and its space
    async fn find_messages_by_channel(
        &mut self,
        channel_id: Snowflake,
        query: MessageQuery,
        visibility: Visibility,
    ) -> RepoResult<Vec<Message>>;

    /// Write body and `updated_at` of a live message
    async fn update_message(&mut self, message: &Message) -> RepoResult<bool>;

    /// Tombstone a message; returns false only when no such row exists
    async fn soft_delete_message(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool>;
}

// ============================================================================
// Media Repository
// ============================================================================

#[async_trait]
pub trait MediaRepository: Send {
    async fn insert_media(&mut self, media: &Media) -> RepoResult<()>;

    /// Media of a message; `visibility` applies to the owning message, its
    /// channel and the channel's space
    async fn find_media_by_message(
        &mut self,
        message_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Media>>;
}
