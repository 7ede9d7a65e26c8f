//! Space entity - top-level workspace grouping channels and members

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{Snowflake, SoftDeletable};

use super::{Channel, SpaceMember};

/// Space (workspace) entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Space {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub owner_id: Snowflake,
    #[serde(skip)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Space {
    pub fn new(
        id: Snowflake,
        name: String,
        description: String,
        owner_id: Snowflake,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            owner_id,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}

impl SoftDeletable for Space {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A space together with its members and live channels
#[derive(Debug, Clone, Serialize)]
pub struct SpaceWithRelated {
    pub space: Space,
    pub members: Vec<SpaceMember>,
    pub channels: Vec<Channel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Visibility;

    #[test]
    fn test_space_creation() {
        let space = Space::new(
            Snowflake::new(1),
            "Pure Illusion".to_string(),
            String::new(),
            Snowflake::new(100),
            Utc::now(),
        );
        assert!(!space.deleted);
        assert!(space.is_owner(Snowflake::new(100)));
        assert!(!space.is_owner(Snowflake::new(200)));
        assert!(Visibility::Live.admits(&space));
    }
}
