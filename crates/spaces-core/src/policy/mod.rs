//! Pure policy checks evaluated inside store transactions

mod posting;

pub use posting::{check_posting, first_active_restraint, PostingContext};
