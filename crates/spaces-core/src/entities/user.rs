//! User entity - identity record referenced by memberships and content

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::Snowflake;

/// User entity
///
/// Owned by the identity store; the core only checks existence and never
/// mutates users beyond seeding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub deactivated: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String, display_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            display_name,
            deactivated: false,
            created_at: now,
        }
    }

    /// Display name, falling back to the username when blank
    pub fn display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let mut user = User::new(
            Snowflake::new(1),
            "orange".to_string(),
            String::new(),
            Utc::now(),
        );
        assert_eq!(user.display_name(), "orange");

        user.display_name = "Orange".to_string();
        assert_eq!(user.display_name(), "Orange");
    }
}
