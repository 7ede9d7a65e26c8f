//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod member;
mod message;
mod restraint;
mod space;
mod user;

pub use channel::{ChannelModel, ChannelWithSpaceModel};
pub use member::{ChannelMemberModel, SpaceMemberModel};
pub use message::{MediaModel, MessageModel};
pub use restraint::RestraintModel;
pub use space::SpaceModel;
pub use user::UserModel;
