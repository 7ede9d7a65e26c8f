//! Space member role

use serde::{Deserialize, Serialize};

/// Permission level of a space member, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpaceRole {
    #[default]
    Member,
    Admin,
    Owner,
}

impl SpaceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Parse the stored representation; unknown values degrade to `Member`
    pub fn parse(value: &str) -> Self {
        match value {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }

    /// Admins and owners may moderate the space
    #[inline]
    pub fn can_moderate(self) -> bool {
        self >= Self::Admin
    }
}
