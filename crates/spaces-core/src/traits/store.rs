//! Store and unit-of-work traits
//!
//! A [`Store`] hands out [`UnitOfWork`]s: one transaction each, exposing all
//! repositories. Dropping a unit of work without calling
//! [`UnitOfWork::commit`] rolls it back, so an abandoned request never
//! leaves partial writes behind.

use async_trait::async_trait;

use crate::value_objects::Snowflake;

use super::repositories::{
    ChannelRepository, MediaRepository, MemberRepository, MessageRepository, RepoResult,
    RestraintRepository, SpaceRepository, UserRepository,
};

#[async_trait]
pub trait UnitOfWork:
    UserRepository
    + SpaceRepository
    + ChannelRepository
    + MemberRepository
    + RestraintRepository
    + MessageRepository
    + MediaRepository
    + Send
{
    /// Serialise this transaction against others touching the same user's
    /// posting rights (restraint writes and message inserts)
    async fn lock_user(&mut self, user_id: Snowflake) -> RepoResult<()>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>>;

    /// Create every table; safe to run repeatedly
    async fn provision(&self) -> RepoResult<()>;

    /// Drop every table, children first; safe on empty or partial schemas
    async fn teardown(&self) -> RepoResult<()>;
}
