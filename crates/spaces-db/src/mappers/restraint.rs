//! Restraint model -> entity mapper

use spaces_core::entities::Restraint;
use spaces_core::error::DomainError;
use spaces_core::value_objects::{Scope, ScopeKind, Snowflake};

use crate::models::RestraintModel;

impl TryFrom<RestraintModel> for Restraint {
    type Error = DomainError;

    fn try_from(model: RestraintModel) -> Result<Self, Self::Error> {
        let scope_kind = ScopeKind::parse(&model.scope_kind).ok_or_else(|| {
            DomainError::InternalError(format!("unknown scope kind in row: {}", model.scope_kind))
        })?;
        let kind = model
            .kind
            .parse()
            .map_err(|e| DomainError::InternalError(format!("restraint row: {e}")))?;

        Ok(Restraint {
            scope: Scope::from_parts(scope_kind, Snowflake::new(model.scope_id)),
            user_id: Snowflake::new(model.user_id),
            kind,
            expires_at: model.expires_at,
            issued_by: Snowflake::new(model.issued_by),
            issued_at: model.issued_at,
            reason: model.reason,
        })
    }
}
