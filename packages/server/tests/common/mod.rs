// Common test utilities

pub mod client;
pub mod fixtures;
pub mod harness;

#[allow(unused_imports)]
pub use client::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use harness::*;
