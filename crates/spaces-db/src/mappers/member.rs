//! Membership model -> entity mappers

use spaces_core::entities::{ChannelMember, SpaceMember};
use spaces_core::value_objects::{Snowflake, SpaceRole};

use crate::models::{ChannelMemberModel, SpaceMemberModel};

impl From<SpaceMemberModel> for SpaceMember {
    fn from(model: SpaceMemberModel) -> Self {
        SpaceMember {
            space_id: Snowflake::new(model.space_id),
            user_id: Snowflake::new(model.user_id),
            role: SpaceRole::parse(&model.role),
            joined_at: model.joined_at,
        }
    }
}

impl From<ChannelMemberModel> for ChannelMember {
    fn from(model: ChannelMemberModel) -> Self {
        ChannelMember {
            channel_id: Snowflake::new(model.channel_id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
        }
    }
}
