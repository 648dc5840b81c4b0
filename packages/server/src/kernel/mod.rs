//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod history;
pub mod postgres;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use history::{HistoryRecorder, DEFAULT_HISTORY_TIMEOUT};
pub use postgres::{PostgresBlogStore, PostgresHistoryLog};
pub use test_dependencies::{InMemoryBlogStore, InMemoryHistoryLog, TestDependencies};
pub use traits::*;
