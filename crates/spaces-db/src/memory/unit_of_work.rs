//! Unit of work over the in-memory tables

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OwnedMutexGuard;
use tracing::instrument;

use spaces_core::entities::{
    Channel, ChannelMember, ChannelWithSpace, Media, Message, Restraint, Space, SpaceMember, User,
};
use spaces_core::error::DomainError;
use spaces_core::traits::{
    ChannelRepository, MediaRepository, MemberRepository, MessageQuery, MessageRepository,
    RepoResult, RestraintRepository, SpaceRepository, UnitOfWork, UserRepository,
};
use spaces_core::value_objects::{Scope, Snowflake, SpaceRole, Visibility};

use super::tables::Tables;

/// Exclusive transaction on a [`MemoryStore`](super::MemoryStore)
///
/// Dropping it without [`UnitOfWork::commit`] discards every write.
pub struct MemoryUnitOfWork {
    committed: OwnedMutexGuard<Tables>,
    work: Tables,
}

impl MemoryUnitOfWork {
    pub(super) fn new(committed: OwnedMutexGuard<Tables>) -> Self {
        let work = committed.clone();
        Self { committed, work }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_user(&mut self, _user_id: Snowflake) -> RepoResult<()> {
        // The store lock already serialises every transaction
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self { mut committed, work } = *self;
        *committed = work;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
    async fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        if self.work.users.contains_key(&user.id) {
            return Err(DomainError::Duplicate(format!("user {}", user.id)));
        }
        if self.work.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Duplicate(format!("username {}", user.username)));
        }

        self.work.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&mut self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.work.users.get(&id).cloned())
    }
}

#[async_trait]
impl SpaceRepository for MemoryUnitOfWork {
    async fn insert_space(&mut self, space: &Space) -> RepoResult<()> {
        Tables::require(&self.work.users, &space.owner_id, "spaces.owner_id")?;
        if self.work.spaces.contains_key(&space.id) {
            return Err(DomainError::Duplicate(format!("space {}", space.id)));
        }

        self.work.spaces.insert(space.id, space.clone());
        Ok(())
    }

    async fn find_space(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Space>> {
        Ok(self
            .work
            .spaces
            .get(&id)
            .filter(|s| visibility.admits(*s))
            .cloned())
    }

    async fn update_space(&mut self, space: &Space) -> RepoResult<bool> {
        Ok(match self.work.spaces.get_mut(&space.id) {
            Some(stored) if !stored.deleted => {
                stored.name.clone_from(&space.name);
                stored.description.clone_from(&space.description);
                stored.updated_at = space.updated_at;
                true
            }
            _ => false,
        })
    }

    #[instrument(skip(self))]
    async fn soft_delete_space(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        Ok(match self.work.spaces.get_mut(&id) {
            Some(space) => {
                if !space.deleted {
                    space.deleted = true;
                    space.updated_at = at;
                }
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl ChannelRepository for MemoryUnitOfWork {
    async fn insert_channel(&mut self, channel: &Channel) -> RepoResult<()> {
        Tables::require(&self.work.spaces, &channel.space_id, "channels.space_id")?;
        if self.work.channels.contains_key(&channel.id) {
            return Err(DomainError::Duplicate(format!("channel {}", channel.id)));
        }

        self.work.channels.insert(channel.id, channel.clone());
        Ok(())
    }

    async fn find_channel(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Channel>> {
        Ok(self
            .work
            .channels
            .get(&id)
            .filter(|c| visibility.admits(*c))
            .cloned())
    }

    async fn find_channels_by_space(
        &mut self,
        space_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Channel>> {
        let space_admitted = self
            .work
            .spaces
            .get(&space_id)
            .is_some_and(|s| visibility.admits(s));
        if !space_admitted {
            return Ok(Vec::new());
        }

        Ok(self
            .work
            .channels
            .values()
            .filter(|c| c.space_id == space_id && visibility.admits(*c))
            .cloned()
            .collect())
    }

    async fn find_channel_with_space(
        &mut self,
        id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Option<ChannelWithSpace>> {
        let Some(channel) = self.work.channels.get(&id).filter(|c| visibility.admits(*c)) else {
            return Ok(None);
        };

        // Inner join: the space is never filtered, only required to exist
        Ok(self.work.spaces.get(&channel.space_id).map(|space| ChannelWithSpace {
            channel: channel.clone(),
            space: space.clone(),
        }))
    }

    async fn update_channel(&mut self, channel: &Channel) -> RepoResult<bool> {
        Ok(match self.work.channels.get_mut(&channel.id) {
            Some(stored) if !stored.deleted => {
                stored.name.clone_from(&channel.name);
                stored.updated_at = channel.updated_at;
                true
            }
            _ => false,
        })
    }

    #[instrument(skip(self))]
    async fn soft_delete_channel(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        Ok(match self.work.channels.get_mut(&id) {
            Some(channel) => {
                if !channel.deleted {
                    channel.deleted = true;
                    channel.updated_at = at;
                }
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl MemberRepository for MemoryUnitOfWork {
    async fn insert_space_member(&mut self, member: &SpaceMember) -> RepoResult<()> {
        Tables::require(&self.work.spaces, &member.space_id, "space_members.space_id")?;
        Tables::require(&self.work.users, &member.user_id, "space_members.user_id")?;

        let key = (member.space_id, member.user_id);
        if self.work.space_members.contains_key(&key) {
            return Err(DomainError::AlreadySpaceMember {
                space_id: member.space_id,
                user_id: member.user_id,
            });
        }

        self.work.space_members.insert(key, member.clone());
        Ok(())
    }

    async fn find_space_member(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<SpaceMember>> {
        Ok(self.work.space_members.get(&(space_id, user_id)).cloned())
    }

    async fn find_space_members(&mut self, space_id: Snowflake) -> RepoResult<Vec<SpaceMember>> {
        Ok(self
            .work
            .space_members
            .range((space_id, Snowflake::new(i64::MIN))..=(space_id, Snowflake::new(i64::MAX)))
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn update_space_role(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
        role: SpaceRole,
    ) -> RepoResult<Option<SpaceMember>> {
        Ok(self
            .work
            .space_members
            .get_mut(&(space_id, user_id))
            .map(|member| {
                member.role = role;
                member.clone()
            }))
    }

    async fn delete_space_member(&mut self, space_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.work.space_members.remove(&(space_id, user_id)).is_some())
    }

    async fn insert_channel_member(&mut self, member: &ChannelMember) -> RepoResult<()> {
        Tables::require(&self.work.channels, &member.channel_id, "channel_members.channel_id")?;
        Tables::require(&self.work.users, &member.user_id, "channel_members.user_id")?;

        let key = (member.channel_id, member.user_id);
        if self.work.channel_members.contains_key(&key) {
            return Err(DomainError::AlreadyChannelMember {
                channel_id: member.channel_id,
                user_id: member.user_id,
            });
        }

        self.work.channel_members.insert(key, member.clone());
        Ok(())
    }

    async fn find_channel_member(
        &mut self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChannelMember>> {
        Ok(self.work.channel_members.get(&(channel_id, user_id)).cloned())
    }

    async fn find_channel_members(&mut self, channel_id: Snowflake) -> RepoResult<Vec<ChannelMember>> {
        Ok(self
            .work
            .channel_members
            .range((channel_id, Snowflake::new(i64::MIN))..=(channel_id, Snowflake::new(i64::MAX)))
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn delete_channel_member(&mut self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.work.channel_members.remove(&(channel_id, user_id)).is_some())
    }

    async fn delete_channel_members_in_space(
        &mut self,
        space_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<u64> {
        let channels = &self.work.channels;
        let before = self.work.channel_members.len();

        self.work.channel_members.retain(|(channel_id, member_id), _| {
            *member_id != user_id
                || channels.get(channel_id).map_or(true, |c| c.space_id != space_id)
        });

        Ok((before - self.work.channel_members.len()) as u64)
    }
}

#[async_trait]
impl RestraintRepository for MemoryUnitOfWork {
    async fn upsert_restraint(&mut self, restraint: &Restraint) -> RepoResult<()> {
        Tables::require(&self.work.users, &restraint.user_id, "restrained_members.user_id")?;

        self.work
            .restraints
            .insert((restraint.scope, restraint.user_id), restraint.clone());
        Ok(())
    }

    async fn find_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<Option<Restraint>> {
        Ok(self.work.restraints.get(&(scope, user_id)).cloned())
    }

    async fn find_restraints_by_scope(&mut self, scope: Scope) -> RepoResult<Vec<Restraint>> {
        let mut restraints: Vec<Restraint> = self
            .work
            .restraints
            .values()
            .filter(|r| r.scope == scope)
            .cloned()
            .collect();
        restraints.sort_by_key(|r| r.user_id);
        Ok(restraints)
    }

    async fn delete_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.work.restraints.remove(&(scope, user_id)).is_some())
    }

    async fn delete_expired_restraints(&mut self, before: DateTime<Utc>) -> RepoResult<u64> {
        let count = self.work.restraints.len();
        self.work
            .restraints
            .retain(|_, r| r.expires_at.map_or(true, |at| at > before));
        Ok((count - self.work.restraints.len()) as u64)
    }
}

#[async_trait]
impl MessageRepository for MemoryUnitOfWork {
    async fn insert_message(&mut self, message: &Message) -> RepoResult<()> {
        Tables::require(&self.work.channels, &message.channel_id, "messages.channel_id")?;
        Tables::require(&self.work.users, &message.author_id, "messages.author_id")?;
        if self.work.messages.contains_key(&message.id) {
            return Err(DomainError::Duplicate(format!("message {}", message.id)));
        }

        self.work.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn find_message(&mut self, id: Snowflake, visibility: Visibility) -> RepoResult<Option<Message>> {
        Ok(self
            .work
            .messages
            .get(&id)
            .filter(|m| self.work.message_visible(m, visibility))
            .cloned())
    }

    async fn find_messages_by_channel(
        &mut self,
        channel_id: Snowflake,
        query: MessageQuery,
        visibility: Visibility,
    ) -> RepoResult<Vec<Message>> {
        let parents_admitted = self
            .work
            .channels
            .get(&channel_id)
            .filter(|c| visibility.admits(*c))
            .and_then(|c| self.work.spaces.get(&c.space_id))
            .is_some_and(|s| visibility.admits(s));
        if !parents_admitted {
            return Ok(Vec::new());
        }

        let upper = query.before.unwrap_or(Snowflake::new(i64::MAX));
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(self
            .work
            .messages
            .range(..upper)
            .rev()
            .map(|(_, m)| m)
            .filter(|m| m.channel_id == channel_id && visibility.admits(*m))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_message(&mut self, message: &Message) -> RepoResult<bool> {
        Ok(match self.work.messages.get_mut(&message.id) {
            Some(stored) if !stored.deleted => {
                stored.body.clone_from(&message.body);
                stored.updated_at = message.updated_at;
                true
            }
            _ => false,
        })
    }

    #[instrument(skip(self))]
    async fn soft_delete_message(&mut self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        Ok(match self.work.messages.get_mut(&id) {
            Some(message) => {
                if !message.deleted {
                    message.deleted = true;
                    message.updated_at = at;
                }
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl MediaRepository for MemoryUnitOfWork {
    async fn insert_media(&mut self, media: &Media) -> RepoResult<()> {
        Tables::require(&self.work.messages, &media.message_id, "media.message_id")?;
        if self.work.media.contains_key(&media.id) {
            return Err(DomainError::Duplicate(format!("media {}", media.id)));
        }

        self.work.media.insert(media.id, media.clone());
        Ok(())
    }

    async fn find_media_by_message(
        &mut self,
        message_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Media>> {
        let message_admitted = self
            .work
            .messages
            .get(&message_id)
            .is_some_and(|m| self.work.message_visible(m, visibility));
        if !message_admitted {
            return Ok(Vec::new());
        }

        Ok(self
            .work
            .media
            .values()
            .filter(|md| md.message_id == message_id)
            .cloned()
            .collect())
    }
}
