//! PostgreSQL implementation of Store and UnitOfWork

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use spaces_core::traits::{RepoResult, Store, UnitOfWork};
use spaces_core::value_objects::Snowflake;

use crate::schema;

use super::error::map_db_error;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn provision(&self) -> RepoResult<()> {
        schema::provision(&self.pool).await
    }

    async fn teardown(&self) -> RepoResult<()> {
        schema::teardown(&self.pool).await
    }
}

/// One PostgreSQL transaction; rolled back by sqlx when dropped uncommitted
pub struct PgUnitOfWork {
    pub(super) tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn lock_user(&mut self, user_id: Snowflake) -> RepoResult<()> {
        // Released automatically at commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        debug!(user_id = %user_id, "Acquired user lock");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
