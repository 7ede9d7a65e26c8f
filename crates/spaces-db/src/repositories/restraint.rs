//! PostgreSQL implementation of RestraintRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use spaces_core::entities::Restraint;
use spaces_core::traits::{RepoResult, RestraintRepository};
use spaces_core::value_objects::{Scope, Snowflake};

use crate::models::RestraintModel;

use super::error::map_db_error;
use super::store::PgUnitOfWork;

#[async_trait]
impl RestraintRepository for PgUnitOfWork {
    #[instrument(skip(self, restraint), fields(scope = %restraint.scope, user_id = %restraint.user_id))]
    async fn upsert_restraint(&mut self, restraint: &Restraint) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO restrained_members
                (scope_kind, scope_id, user_id, kind, expires_at, issued_by, issued_at, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (scope_kind, scope_id, user_id) DO UPDATE
            SET kind = EXCLUDED.kind,
                expires_at = EXCLUDED.expires_at,
                issued_by = EXCLUDED.issued_by,
                issued_at = EXCLUDED.issued_at,
                reason = EXCLUDED.reason
            "#,
        )
        .bind(restraint.scope.kind().as_str())
        .bind(restraint.scope.id().into_inner())
        .bind(restraint.user_id.into_inner())
        .bind(restraint.kind.as_str())
        .bind(restraint.expires_at)
        .bind(restraint.issued_by.into_inner())
        .bind(restraint.issued_at)
        .bind(&restraint.reason)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<Option<Restraint>> {
        let result = sqlx::query_as::<_, RestraintModel>(
            r#"
            SELECT scope_kind, scope_id, user_id, kind, expires_at, issued_by, issued_at, reason
            FROM restrained_members
            WHERE scope_kind = $1 AND scope_id = $2 AND user_id = $3
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id().into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        result.map(Restraint::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_restraints_by_scope(&mut self, scope: Scope) -> RepoResult<Vec<Restraint>> {
        let results = sqlx::query_as::<_, RestraintModel>(
            r#"
            SELECT scope_kind, scope_id, user_id, kind, expires_at, issued_by, issued_at, reason
            FROM restrained_members
            WHERE scope_kind = $1 AND scope_id = $2
            ORDER BY user_id
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id().into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Restraint::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete_restraint(&mut self, scope: Scope, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM restrained_members
            WHERE scope_kind = $1 AND scope_id = $2 AND user_id = $3
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id().into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_expired_restraints(&mut self, before: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM restrained_members
            WHERE expires_at IS NOT NULL AND expires_at <= $1
            "#,
        )
        .bind(before)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
