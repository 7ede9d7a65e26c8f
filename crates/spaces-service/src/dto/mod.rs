//! Data transfer objects for service inputs
//!
//! Every request implements `Deserialize` and `Validate`; services call
//! `validate()` before touching the store.

pub mod requests;

pub use requests::{
    AttachMediaRequest, CreateChannelRequest, CreateSpaceRequest, CreateUserRequest,
    EditMessageRequest, MessagePageQuery, PostMessageRequest, RenameChannelRequest,
    RenameSpaceRequest, RestrainRequest,
};
