//! Schema lifecycle
//!
//! The DDL lives in plain SQL files and is executed with `sqlx::raw_sql`,
//! so provisioning needs no migration history table.

use sqlx::PgPool;
use tracing::{info, instrument};

use spaces_core::error::DomainError;

use crate::repositories::map_db_error;

pub const PROVISION_SQL: &str = include_str!("provision.sql");
pub const TEARDOWN_SQL: &str = include_str!("teardown.sql");

/// Tables in teardown order
pub const TABLES: [&str; 8] = [
    "media",
    "channel_members",
    "space_members",
    "channels",
    "spaces",
    "users",
    "messages",
    "restrained_members",
];

/// Create every table and index that does not exist yet
#[instrument(skip(pool))]
pub async fn provision(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::raw_sql(PROVISION_SQL)
        .execute(pool)
        .await
        .map_err(map_db_error)?;

    info!("Schema provisioned");
    Ok(())
}

/// Drop every table, children first
#[instrument(skip(pool))]
pub async fn teardown(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::raw_sql(TEARDOWN_SQL)
        .execute(pool)
        .await
        .map_err(map_db_error)?;

    info!("Schema torn down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teardown_drops_in_order() {
        let drops: Vec<&str> = TEARDOWN_SQL
            .lines()
            .filter_map(|line| line.strip_prefix("DROP TABLE IF EXISTS "))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect();

        assert_eq!(drops, TABLES);
    }

    #[test]
    fn test_provision_is_idempotent_ddl() {
        for line in PROVISION_SQL.lines() {
            let line = line.trim_start();
            if line.starts_with("CREATE") {
                assert!(line.contains("IF NOT EXISTS"), "non-idempotent DDL: {line}");
            }
        }
        for table in TABLES {
            assert!(PROVISION_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")));
        }
    }
}
