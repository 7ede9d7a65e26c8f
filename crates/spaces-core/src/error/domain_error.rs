//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{RestraintKind, Scope, Snowflake};

/// Coarse error classes that callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Referenced entity absent or hidden by a soft-delete filter
    NotFound,
    /// Uniqueness violation
    Conflict,
    /// Action disallowed by moderation or a missing prerequisite membership
    PolicyViolation,
    /// Malformed input
    Validation,
    /// Opaque storage failure
    Storage,
}

/// Why an action was refused
///
/// The `Display` text is written for end users and is surfaced verbatim as
/// the permission-denial message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("You must be a member of space {space_id} first")]
    NotSpaceMember { space_id: Snowflake },

    #[error("You are not a member of channel {channel_id}")]
    NotChannelMember { channel_id: Snowflake },

    #[error("Space {space_id} is no longer available")]
    SpaceUnavailable { space_id: Snowflake },

    #[error("You are restrained ({kind}) in {scope}{}", until_suffix(.expires_at))]
    Restrained {
        scope: Scope,
        kind: RestraintKind,
        expires_at: Option<DateTime<Utc>>,
    },

    #[error("Only the author or a space moderator can do that")]
    NotAuthorOrModerator,

    #[error("Only the author can edit this message")]
    NotAuthor,

    #[error("Only admins or the owner of space {space_id} can do that")]
    NotSpaceModerator { space_id: Snowflake },
}

fn until_suffix(expires_at: &Option<DateTime<Utc>>) -> String {
    match expires_at {
        Some(at) => format!(" until {}", at.to_rfc3339()),
        None => String::new(),
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Space not found: {0}")]
    SpaceNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User {user_id} is already a member of space {space_id}")]
    AlreadySpaceMember {
        space_id: Snowflake,
        user_id: Snowflake,
    },

    #[error("User {user_id} is already a member of channel {channel_id}")]
    AlreadyChannelMember {
        channel_id: Snowflake,
        user_id: Snowflake,
    },

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    // =========================================================================
    // Policy Errors
    // =========================================================================
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_)
            | Self::SpaceNotFound(_)
            | Self::ChannelNotFound(_)
            | Self::MessageNotFound(_) => ErrorKind::NotFound,
            Self::AlreadySpaceMember { .. }
            | Self::AlreadyChannelMember { .. }
            | Self::Duplicate(_) => ErrorKind::Conflict,
            Self::Policy(_) => ErrorKind::PolicyViolation,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::DatabaseError(_) | Self::InternalError(_) => ErrorKind::Storage,
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::SpaceNotFound(_) => "UNKNOWN_SPACE",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::AlreadySpaceMember { .. } | Self::AlreadyChannelMember { .. } => "ALREADY_MEMBER",
            Self::Duplicate(_) => "DUPLICATE",
            Self::Policy(PolicyViolation::Restrained { .. }) => "RESTRAINED",
            Self::Policy(_) => "POLICY_VIOLATION",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    #[inline]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    #[inline]
    pub fn is_policy_violation(&self) -> bool {
        self.kind() == ErrorKind::PolicyViolation
    }

    /// NotFound and Conflict can be handled by the caller; the rest end the request
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound | ErrorKind::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            DomainError::SpaceNotFound(Snowflake::new(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::AlreadySpaceMember {
                space_id: Snowflake::new(1),
                user_id: Snowflake::new(2)
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DomainError::from(PolicyViolation::NotAuthorOrModerator).kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(
            DomainError::DatabaseError("boom".into()).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(DomainError::ChannelNotFound(Snowflake::new(1)).is_recoverable());
        assert!(!DomainError::from(PolicyViolation::NotChannelMember {
            channel_id: Snowflake::new(1)
        })
        .is_recoverable());
        assert!(!DomainError::DatabaseError("x".into()).is_recoverable());
    }

    #[test]
    fn test_policy_messages_are_user_facing() {
        let err = DomainError::from(PolicyViolation::NotSpaceMember {
            space_id: Snowflake::new(5),
        });
        assert_eq!(err.to_string(), "You must be a member of space 5 first");
        assert_eq!(err.code(), "POLICY_VIOLATION");

        let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let err = DomainError::from(PolicyViolation::Restrained {
            scope: Scope::Channel(Snowflake::new(9)),
            kind: RestraintKind::Mute,
            expires_at: Some(until),
        });
        assert_eq!(
            err.to_string(),
            "You are restrained (mute) in channel:9 until 2030-01-01T00:00:00+00:00"
        );
        assert_eq!(err.code(), "RESTRAINED");
    }
}
