//! Membership database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for space_members table
#[derive(Debug, Clone, FromRow)]
pub struct SpaceMemberModel {
    pub space_id: i64,
    pub user_id: i64,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Database model for channel_members table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelMemberModel {
    pub channel_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
}
