//! Auth domain - session token verification and identity normalization
//!
//! Token issuing belongs to the external identity provider; this domain only
//! verifies tokens and maps their claims onto an `Identity`.

pub mod identity;
pub mod jwt;

pub use identity::{is_admin, IdentityProvider, DEFAULT_ROLES_CLAIM};
pub use jwt::{Claims, JwtService};
