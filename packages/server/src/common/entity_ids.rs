//! Typed ID definitions for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::Id;

/// Marker type for blog posts.
pub struct Blog;

/// Typed ID for blog posts.
pub type BlogId = Id<Blog>;

/// Identifier of an author.
///
/// This is the identity provider's subject claim (e.g. `auth0|abc123`), not
/// a UUID, so it gets its own text newtype instead of `Id<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
