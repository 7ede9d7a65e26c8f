//! # spaces-core
//!
//! Domain layer for the spaces backend: entities, value objects, the posting
//! policy, and the store traits infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, ChannelMember, ChannelWithSpace, Media, Message, Restraint, RestraintState, Space,
    SpaceMember, SpaceWithRelated, User,
};
pub use error::{DomainError, ErrorKind, PolicyViolation};
pub use traits::{Clock, ManualClock, MessageQuery, RepoResult, Store, SystemClock, UnitOfWork};
pub use value_objects::{
    ModerationPolicy, RestraintKind, Scope, ScopeKind, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, SoftDeletable, SpaceRole, Visibility,
};
