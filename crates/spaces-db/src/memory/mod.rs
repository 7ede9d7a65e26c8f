//! In-memory store
//!
//! Same transactional contract as the PostgreSQL store, for tests and
//! embedding. A unit of work holds the store lock for its whole lifetime and
//! mutates a private copy of the tables, which replaces the shared copy on
//! commit. Transactions are therefore fully serialised.

mod tables;
mod unit_of_work;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use spaces_core::traits::{RepoResult, Store, UnitOfWork};

use tables::Tables;
pub use unit_of_work::MemoryUnitOfWork;

/// In-process store backed by ordered maps
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork::new(guard)))
    }

    #[instrument(skip(self))]
    async fn provision(&self) -> RepoResult<()> {
        info!("Memory store provisioned");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn teardown(&self) -> RepoResult<()> {
        *self.tables.lock().await = Tables::default();
        info!("Memory store torn down");
        Ok(())
    }
}
