//! Blog domain actions - entry-point business logic
//!
//! Called directly from the HTTP handlers. Actions are self-contained: they
//! take the caller's identity and raw input, run the authorization check,
//! and return models. History snapshots are written here, after the store
//! mutation succeeds.

pub mod admin;
pub mod core;
pub mod listing;
pub mod moderation;

pub use admin::*;
pub use self::core::*;
pub use listing::*;
pub use moderation::*;
