//! Authorization for the moderation workflow.
//!
//! Handlers receive a normalized [`Identity`] and gate every action through
//! a capability check:
//!
//! ```rust
//! use moderation_core::common::auth::{Actor, Capability, Identity, Role};
//!
//! let identity = Identity::new("auth0|42", "ada@example.com", "Ada", Role::User);
//! let author = identity.subject_id.clone();
//!
//! Actor::new(&identity)
//!     .can(Capability::EditBlog { author_id: &author })
//!     .check()
//!     .unwrap();
//! ```

mod builder;
mod capability;
mod errors;
mod identity;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::Capability;
pub use errors::AuthError;
pub use identity::{Identity, Role};
