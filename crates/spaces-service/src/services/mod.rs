//! Business logic services
//!
//! Every public operation opens one unit of work, performs its checks and
//! writes inside it, and commits. Read-only operations simply drop the unit
//! of work, which rolls it back.

pub mod content;
pub mod context;
pub mod error;
pub mod membership;
pub mod query;
pub mod user;

// Re-export all services for convenience
pub use content::{ContentKind, ContentService};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use membership::MembershipService;
pub use query::QueryService;
pub use user::UserService;
