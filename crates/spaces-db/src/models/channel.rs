//! Channel database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub space_id: i64,
    pub name: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the channel/space join, space columns prefixed with `space_`
#[derive(Debug, Clone, FromRow)]
pub struct ChannelWithSpaceModel {
    pub id: i64,
    pub space_id: i64,
    pub name: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub space_name: String,
    pub space_description: String,
    pub space_owner_id: i64,
    pub space_deleted: bool,
    pub space_created_at: DateTime<Utc>,
    pub space_updated_at: DateTime<Utc>,
}
