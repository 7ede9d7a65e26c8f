//! Message and media model -> entity mappers

use spaces_core::entities::{Media, Message};
use spaces_core::value_objects::Snowflake;

use crate::models::{MediaModel, MessageModel};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            author_id: Snowflake::new(model.author_id),
            body: model.body,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted: model.deleted,
        }
    }
}

impl From<MediaModel> for Media {
    fn from(model: MediaModel) -> Self {
        Media {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            storage_ref: model.storage_ref,
            content_type: model.content_type,
            created_at: model.created_at,
        }
    }
}
