pub mod author;
pub mod blog;

pub use author::*;
pub use blog::*;
