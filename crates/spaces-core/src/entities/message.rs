//! Message and media entities

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{Snowflake, SoftDeletable};

/// Message entity
///
/// Deletion tombstones the row; the body and any media stay in place for
/// audit reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Last edit or deletion
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

impl Message {
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        body: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            body,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Replace the body, stamping the edit time
    pub fn edit(&mut self, body: String, now: DateTime<Utc>) {
        self.body = body;
        self.updated_at = now;
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        !self.deleted && self.updated_at > self.created_at
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Get a truncated preview of the body, cut on a char boundary
    pub fn preview(&self, max_len: usize) -> &str {
        if self.body.len() <= max_len {
            return &self.body;
        }
        let mut end = max_len;
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        &self.body[..end]
    }
}

impl SoftDeletable for Message {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Media attachment owned by exactly one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub storage_ref: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl Media {
    pub fn new(
        id: Snowflake,
        message_id: Snowflake,
        storage_ref: String,
        content_type: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message_id,
            storage_ref,
            content_type,
            created_at: now,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
