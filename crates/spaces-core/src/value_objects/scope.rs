//! Membership/moderation scope - a space or a single channel

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Snowflake;

/// The container a membership or restraint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    Space(Snowflake),
    Channel(Snowflake),
}

/// Discriminant of [`Scope`], stored alongside the scope id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Space,
    Channel,
}

impl Scope {
    #[inline]
    pub fn id(self) -> Snowflake {
        match self {
            Self::Space(id) | Self::Channel(id) => id,
        }
    }

    #[inline]
    pub fn kind(self) -> ScopeKind {
        match self {
            Self::Space(_) => ScopeKind::Space,
            Self::Channel(_) => ScopeKind::Channel,
        }
    }

    /// Rebuild a scope from its stored parts
    pub fn from_parts(kind: ScopeKind, id: Snowflake) -> Self {
        match kind {
            ScopeKind::Space => Self::Space(id),
            ScopeKind::Channel => Self::Channel(id),
        }
    }
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Channel => "channel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "channel" => Some(Self::Channel),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id())
    }
}
