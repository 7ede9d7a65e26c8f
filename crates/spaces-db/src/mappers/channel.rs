//! Channel model -> entity mappers

use spaces_core::entities::{Channel, ChannelWithSpace, Space};
use spaces_core::value_objects::Snowflake;

use crate::models::{ChannelModel, ChannelWithSpaceModel};

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            space_id: Snowflake::new(model.space_id),
            name: model.name,
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ChannelWithSpaceModel> for ChannelWithSpace {
    fn from(row: ChannelWithSpaceModel) -> Self {
        let space = Space {
            id: Snowflake::new(row.space_id),
            name: row.space_name,
            description: row.space_description,
            owner_id: Snowflake::new(row.space_owner_id),
            deleted: row.space_deleted,
            created_at: row.space_created_at,
            updated_at: row.space_updated_at,
        };
        let channel = Channel {
            id: Snowflake::new(row.id),
            space_id: space.id,
            name: row.name,
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        ChannelWithSpace { channel, space }
    }
}
