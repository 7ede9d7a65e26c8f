//! Traits (ports) implemented by infrastructure crates

mod clock;
mod repositories;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repositories::{
    ChannelRepository, MediaRepository, MemberRepository, MessageQuery, MessageRepository,
    RepoResult, RestraintRepository, SpaceRepository, UserRepository,
};
pub use store::{Store, UnitOfWork};
