//! Model to entity mappers
//!
//! Rows convert to domain entities with `From`, except restraints whose
//! text columns must be parsed and therefore use `TryFrom`.

mod channel;
mod member;
mod message;
mod restraint;
mod space;
mod user;
