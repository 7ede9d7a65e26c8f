//! # spaces-db
//!
//! Storage layer implementing the spaces-core store traits.
//!
//! - [`PgStore`]: PostgreSQL via SQLx, one database transaction per unit of work
//! - [`MemoryStore`]: in-process tables with the same transactional contract
//! - [`schema`]: idempotent provisioning and teardown of the PostgreSQL schema
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spaces_db::{create_pool, PgStore, PoolConfig};
//! use spaces_core::traits::Store;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/spaces")).await?;
//!     let store = PgStore::new(pool);
//!     store.provision().await?;
//!
//!     let mut uow = store.begin().await?;
//!     // Use the repositories...
//!     uow.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{LiveFilter, PgStore, PgUnitOfWork};
