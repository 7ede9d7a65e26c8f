//! Restraint entity - a moderation action against a member within a scope

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::{RestraintKind, Scope, Snowflake};

/// Restrained member record
///
/// At most one exists per (scope, user). Expiry is lazy: a row whose
/// `expires_at` has passed is still stored but is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restraint {
    pub scope: Scope,
    pub user_id: Snowflake,
    pub kind: RestraintKind,
    /// `None` means indefinite
    pub expires_at: Option<DateTime<Utc>>,
    pub issued_by: Snowflake,
    pub issued_at: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Observable restraint state at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestraintState {
    Active,
    Expired,
}

impl Restraint {
    /// State of this restraint at `at`
    pub fn state_at(&self, at: DateTime<Utc>) -> RestraintState {
        match self.expires_at {
            Some(expires_at) if expires_at <= at => RestraintState::Expired,
            _ => RestraintState::Active,
        }
    }

    #[inline]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.state_at(at) == RestraintState::Active
    }

    #[inline]
    pub fn is_indefinite(&self) -> bool {
        self.expires_at.is_none()
    }
}
