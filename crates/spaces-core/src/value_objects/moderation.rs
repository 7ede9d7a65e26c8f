//! Restraint kinds and the policy deciding which of them block posting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of moderation action recorded against a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestraintKind {
    Mute,
    Ban,
    Timeout,
}

impl RestraintKind {
    pub const ALL: [RestraintKind; 3] = [Self::Mute, Self::Ban, Self::Timeout];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mute => "mute",
            Self::Ban => "ban",
            Self::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown restraint kind: {0}")]
pub struct UnknownRestraintKind(pub String);

impl FromStr for RestraintKind {
    type Err = UnknownRestraintKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mute" => Ok(Self::Mute),
            "ban" => Ok(Self::Ban),
            "timeout" => Ok(Self::Timeout),
            other => Err(UnknownRestraintKind(other.to_string())),
        }
    }
}

impl fmt::Display for RestraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which restraint kinds take away posting rights
///
/// The engine itself only reports presence, kind and expiry of a restraint;
/// this policy is the one place that interprets kinds, and it is loaded from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPolicy {
    posting_blocked: Vec<RestraintKind>,
}

impl ModerationPolicy {
    pub fn new(posting_blocked: impl IntoIterator<Item = RestraintKind>) -> Self {
        let mut kinds: Vec<_> = posting_blocked.into_iter().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds.dedup();
        Self {
            posting_blocked: kinds,
        }
    }

    #[inline]
    pub fn blocks_posting(&self, kind: RestraintKind) -> bool {
        self.posting_blocked.contains(&kind)
    }

    pub fn posting_blocked(&self) -> &[RestraintKind] {
        &self.posting_blocked
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::new(RestraintKind::ALL)
    }
}
