// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod utils;

pub use auth::{Actor, AuthError, Capability, Identity, Role};
pub use entity_ids::*;
pub use id::Id;
