//! Domain entities - core business objects

mod channel;
mod member;
mod message;
mod restraint;
mod space;
mod user;

pub use channel::{Channel, ChannelWithSpace};
pub use member::{ChannelMember, SpaceMember};
pub use message::{Media, Message};
pub use restraint::{Restraint, RestraintState};
pub use space::{Space, SpaceWithRelated};
pub use user::User;
