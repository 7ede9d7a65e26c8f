//! Space database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for spaces table
#[derive(Debug, Clone, FromRow)]
pub struct SpaceModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub owner_id: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
