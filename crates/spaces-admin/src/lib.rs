//! # spaces-admin
//!
//! Operator commands run against the configured store: schema lifecycle and
//! compaction of expired restraints.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::{connect, execute, Outcome};
