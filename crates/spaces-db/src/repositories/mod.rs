//! PostgreSQL store
//!
//! [`PgStore`] hands out [`PgUnitOfWork`]s, each wrapping one database
//! transaction. The repository traits from spaces-core are implemented on
//! the unit of work, one file per aggregate.

mod channel;
mod error;
mod filters;
mod member;
mod message;
mod restraint;
mod space;
mod store;
mod user;

pub use error::{map_db_error, map_unique_violation};
pub use filters::LiveFilter;
pub use store::{PgStore, PgUnitOfWork};
