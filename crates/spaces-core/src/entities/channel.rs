//! Channel entity - a sub-container of exactly one space

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{Snowflake, SoftDeletable};

use super::Space;

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: Snowflake,
    pub space_id: Snowflake,
    pub name: String,
    #[serde(skip)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    pub fn new(id: Snowflake, space_id: Snowflake, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            space_id,
            name,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SoftDeletable for Channel {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Result of the channel-with-space join
///
/// Only the channel side of the join is filtered for soft deletion. The
/// parent space is returned as stored, so callers that care whether the
/// workspace is still live must check [`ChannelWithSpace::space_is_live`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelWithSpace {
    pub channel: Channel,
    pub space: Space,
}

impl ChannelWithSpace {
    #[inline]
    pub fn space_is_live(&self) -> bool {
        !self.space.deleted
    }
}
