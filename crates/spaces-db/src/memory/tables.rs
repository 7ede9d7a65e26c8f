//! Table state of the in-memory store

use std::collections::{BTreeMap, HashMap};

use spaces_core::entities::{
    Channel, ChannelMember, Media, Message, Restraint, Space, SpaceMember, User,
};
use spaces_core::error::DomainError;
use spaces_core::value_objects::{Scope, Snowflake, Visibility};

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<Snowflake, User>,
    pub spaces: BTreeMap<Snowflake, Space>,
    pub channels: BTreeMap<Snowflake, Channel>,
    pub space_members: BTreeMap<(Snowflake, Snowflake), SpaceMember>,
    pub channel_members: BTreeMap<(Snowflake, Snowflake), ChannelMember>,
    pub messages: BTreeMap<Snowflake, Message>,
    pub media: BTreeMap<Snowflake, Media>,
    pub restraints: HashMap<(Scope, Snowflake), Restraint>,
}

impl Tables {
    /// The message, its channel and the channel's space all pass `visibility`
    pub fn message_visible(&self, message: &Message, visibility: Visibility) -> bool {
        visibility.admits(message)
            && self
                .channels
                .get(&message.channel_id)
                .filter(|c| visibility.admits(*c))
                .and_then(|c| self.spaces.get(&c.space_id))
                .is_some_and(|s| visibility.admits(s))
    }

    /// Mirror of a foreign key check
    pub fn require<K: Ord, V>(
        table: &BTreeMap<K, V>,
        key: &K,
        constraint: &str,
    ) -> Result<(), DomainError> {
        if table.contains_key(key) {
            Ok(())
        } else {
            Err(DomainError::DatabaseError(format!(
                "foreign key violation: {constraint}"
            )))
        }
    }
}
