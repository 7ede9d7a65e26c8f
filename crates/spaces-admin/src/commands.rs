//! Command execution
//!
//! Commands run against any [`Store`], so they can be exercised against the
//! in-memory store as well as PostgreSQL.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, instrument};

use spaces_common::AppConfig;
use spaces_core::Store;
use spaces_db::{create_pool, PgStore, PoolConfig};
use spaces_service::{MembershipService, ServiceContext};

use crate::cli::Command;

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Provisioned,
    TornDown,
    Compacted { removed: u64 },
}

/// Connect to the configured PostgreSQL database
pub async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let pool_config = PoolConfig::from(&config.database);
    let pool = create_pool(&pool_config)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("PostgreSQL connection established");

    Ok(Arc::new(PgStore::new(pool)))
}

/// Run one command against `store`
#[instrument(skip(store, config), fields(command = command.name()))]
pub async fn execute(
    command: Command,
    store: Arc<dyn Store>,
    config: &AppConfig,
) -> anyhow::Result<Outcome> {
    match command {
        Command::Provision => {
            store.provision().await.context("provision failed")?;
            info!("Schema provisioned");
            Ok(Outcome::Provisioned)
        }
        Command::Teardown { yes } => {
            if !yes {
                bail!("teardown drops every table; re-run with --yes");
            }
            store.teardown().await.context("teardown failed")?;
            info!("Schema torn down");
            Ok(Outcome::TornDown)
        }
        Command::Compact => {
            let ctx = ServiceContext::from_config(store, config)?;
            let removed = MembershipService::new(&ctx)
                .purge_expired_restraints()
                .await
                .context("compaction failed")?;
            info!(removed, "Expired restraints compacted");
            Ok(Outcome::Compacted { removed })
        }
    }
}
