//! Restraint database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for restrained_members table
#[derive(Debug, Clone, FromRow)]
pub struct RestraintModel {
    pub scope_kind: String,
    pub scope_id: i64,
    pub user_id: i64,
    pub kind: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub issued_by: i64,
    pub issued_at: DateTime<Utc>,
    pub reason: Option<String>,
}
