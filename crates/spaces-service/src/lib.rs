//! # spaces-service
//!
//! Application layer: the membership engine, the content store and the
//! query layer, each running every operation in one store transaction.

pub mod dto;
pub mod services;

pub use services::{
    ContentKind, ContentService, MembershipService, QueryService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
