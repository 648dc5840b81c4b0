// Business domains
pub mod auth;
pub mod blogs;
pub mod history;
