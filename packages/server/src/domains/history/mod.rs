//! Status history of blogs, kept in a store separate from the blogs table.

pub mod actions;
pub mod models;

pub use actions::list_history;
pub use models::{HistoryEvent, HISTORY_APPLICATION};
