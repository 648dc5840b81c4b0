use super::{AuthError, Capability, Identity};

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// # use moderation_core::common::auth::{Actor, Capability, Identity, Role};
/// # let identity = Identity::new("auth0|1", "a@example.com", "A", Role::Admin);
/// Actor::new(&identity)
///     .can(Capability::ModerateBlogs)
///     .check()?;
/// # Ok::<(), moderation_core::common::auth::AuthError>(())
/// ```
pub struct Actor<'a> {
    identity: &'a Identity,
}

impl<'a> Actor<'a> {
    pub fn new(identity: &'a Identity) -> Self {
        Self { identity }
    }

    /// Specify what capability the actor needs
    pub fn can<'c>(self, capability: Capability<'c>) -> CapabilityBuilder<'a, 'c> {
        CapabilityBuilder {
            identity: self.identity,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a, 'c> {
    identity: &'a Identity,
    capability: Capability<'c>,
}

impl CapabilityBuilder<'_, '_> {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        check_permission(self.identity, &self.capability)
    }
}

/// Admins may do everything. Otherwise admin-only capabilities fail with
/// `AdminRequired` and ownership capabilities require the caller to be the
/// blog's author.
fn check_permission(identity: &Identity, capability: &Capability<'_>) -> Result<(), AuthError> {
    if identity.is_admin() {
        return Ok(());
    }

    if capability.requires_admin() {
        return Err(AuthError::AdminRequired);
    }

    match capability.owner() {
        Some(author_id) if *author_id == identity.subject_id => Ok(()),
        _ => Err(AuthError::PermissionDenied(
            "only the author or an admin may do this".to_string(),
        )),
    }
}
