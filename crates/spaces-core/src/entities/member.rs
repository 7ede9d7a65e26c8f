//! Membership entities - junctions between users and spaces/channels
//!
//! Memberships have no soft-delete: the absence of the row is the state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{Snowflake, SpaceRole};

/// Space member entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceMember {
    pub space_id: Snowflake,
    pub user_id: Snowflake,
    pub role: SpaceRole,
    pub joined_at: DateTime<Utc>,
}

impl SpaceMember {
    pub fn new(space_id: Snowflake, user_id: Snowflake, role: SpaceRole, now: DateTime<Utc>) -> Self {
        Self {
            space_id,
            user_id,
            role,
            joined_at: now,
        }
    }

    #[inline]
    pub fn can_moderate(&self) -> bool {
        self.role.can_moderate()
    }
}

/// Channel member entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMember {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
}

impl ChannelMember {
    pub fn new(channel_id: Snowflake, user_id: Snowflake, now: DateTime<Utc>) -> Self {
        Self {
            channel_id,
            user_id,
            joined_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_member_moderation() {
        let now = Utc::now();
        let member = SpaceMember::new(Snowflake::new(1), Snowflake::new(2), SpaceRole::Member, now);
        assert!(!member.can_moderate());

        let admin = SpaceMember::new(Snowflake::new(1), Snowflake::new(3), SpaceRole::Admin, now);
        assert!(admin.can_moderate());
    }
}
