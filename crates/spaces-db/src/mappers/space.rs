//! Space model -> entity mapper

use spaces_core::entities::Space;
use spaces_core::value_objects::Snowflake;

use crate::models::SpaceModel;

impl From<SpaceModel> for Space {
    fn from(model: SpaceModel) -> Self {
        Space {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            owner_id: Snowflake::new(model.owner_id),
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
