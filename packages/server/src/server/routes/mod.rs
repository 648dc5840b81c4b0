// HTTP routes
pub mod admin;
pub mod blogs;
pub mod health;
pub mod history;

pub use admin::*;
pub use blogs::*;
pub use health::*;
pub use history::*;
