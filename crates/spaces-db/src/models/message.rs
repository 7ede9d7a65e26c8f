//! Message and media database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
}

/// Database model for media table
#[derive(Debug, Clone, FromRow)]
pub struct MediaModel {
    pub id: i64,
    pub message_id: i64,
    pub storage_ref: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}
