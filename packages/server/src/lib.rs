// Blog Moderation Service - API Core
//
// Posts are submitted PENDING, approved or rejected by an admin, and every
// applied status change is snapshotted to a separate history log.
//
// Business logic lives per-domain in domains/*/actions; infrastructure
// traits and their implementations live in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
