//! Blog moderation workflow.
//!
//! Posts start PENDING and are approved or rejected by an admin. Authors and
//! admins may edit or delete; every applied status change is snapshotted to
//! the history log.

pub mod actions;
pub mod data;
pub mod errors;
pub mod machines;
pub mod models;

pub use errors::{BlogError, BlogResult};
pub use models::{Author, AuthorWithStats, Blog, BlogStatus, BlogWithAuthor};
