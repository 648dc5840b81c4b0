pub mod history_event;

pub use history_event::*;
