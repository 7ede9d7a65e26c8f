//! Value objects - immutable types that represent domain concepts

mod moderation;
mod role;
mod scope;
mod snowflake;
mod visibility;

pub use moderation::{ModerationPolicy, RestraintKind, UnknownRestraintKind};
pub use role::SpaceRole;
pub use scope::{Scope, ScopeKind};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use visibility::{SoftDeletable, Visibility};
