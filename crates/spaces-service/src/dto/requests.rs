//! Request DTOs for service operations

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use spaces_core::{RestraintKind, Snowflake};

// ============================================================================
// User Requests
// ============================================================================

/// Seed an identity record
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
}

// ============================================================================
// Content Requests
// ============================================================================

/// Create space request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 100, message = "Space name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Create channel request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Channel name must be 1-100 characters"))]
    pub name: String,
}

/// Post message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message body must be 1-4000 characters"))]
    pub body: String,
}

/// Attach media request; the bytes live in external storage
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttachMediaRequest {
    #[validate(length(min = 1, max = 2048, message = "Storage reference must be 1-2048 characters"))]
    pub storage_ref: String,

    #[validate(length(min = 1, max = 255, message = "Content type must be 1-255 characters"))]
    pub content_type: String,
}

// ============================================================================
// Edit Requests
// ============================================================================

/// Rename a space; a missing description keeps the current one
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameSpaceRequest {
    #[validate(length(min = 1, max = 100, message = "Space name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Channel name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message body must be 1-4000 characters"))]
    pub body: String,
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// Restrain a member; `expires_at: None` means indefinitely
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestrainRequest {
    pub kind: RestraintKind,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    #[validate(length(max = 512, message = "Reason must be at most 512 characters"))]
    #[serde(default)]
    pub reason: Option<String>,
}

// ============================================================================
// Query Requests
// ============================================================================

/// Cursor page of a channel's messages, newest first
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct MessagePageQuery {
    /// Only messages older than this id
    #[serde(default)]
    pub before: Option<Snowflake>,

    #[validate(range(min = 1, max = 256, message = "Limit must be between 1 and 256"))]
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

fn default_page_limit() -> i64 {
    50
}

impl Default for MessagePageQuery {
    fn default() -> Self {
        Self {
            before: None,
            limit: default_page_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_body_bounds() {
        let empty = PostMessageRequest { body: String::new() };
        assert!(empty.validate().is_err());

        let max = PostMessageRequest { body: "a".repeat(4000) };
        assert!(max.validate().is_ok());

        let over = PostMessageRequest { body: "a".repeat(4001) };
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        // 100 multi-byte characters are within the limit
        let request = CreateSpaceRequest {
            name: "é".repeat(100),
            description: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_page_limit_range() {
        assert!(MessagePageQuery::default().validate().is_ok());
        assert!(MessagePageQuery { before: None, limit: 0 }.validate().is_err());
        assert!(MessagePageQuery { before: None, limit: 257 }.validate().is_err());
    }

    #[test]
    fn test_restrain_request_from_json() {
        let request: RestrainRequest =
            serde_json::from_str(r#"{"kind":"timeout","expires_at":"2024-05-01T00:00:00Z"}"#).unwrap();
        assert_eq!(request.kind, RestraintKind::Timeout);
        assert!(request.expires_at.is_some());
        assert!(request.reason.is_none());

        let page: MessagePageQuery = serde_json::from_str(r#"{"before":"42"}"#).unwrap();
        assert_eq!(page.before, Some(Snowflake::new(42)));
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_rename_space_keeps_description_when_absent() {
        let request: RenameSpaceRequest = serde_json::from_str(r#"{"name":"Ops"}"#).unwrap();
        assert!(request.description.is_none());
        assert!(request.validate().is_ok());

        let blank = RenameChannelRequest { name: String::new() };
        assert!(blank.validate().is_err());
        assert!(EditMessageRequest { body: "a".repeat(4001) }.validate().is_err());
    }

    #[test]
    fn test_blank_media_rejected() {
        let request = AttachMediaRequest {
            storage_ref: String::new(),
            content_type: "image/png".into(),
        };
        assert!(request.validate().is_err());
    }
}
