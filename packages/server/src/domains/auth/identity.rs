//! Identity provider adapter.
//!
//! Turns a bearer token into a normalized [`Identity`]. Providers disagree on
//! where the role lives: some set a plain `role` claim, others a namespaced
//! roles claim holding either a string or an array. Both are folded into a
//! single [`Role`] here so nothing downstream inspects raw claims.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::jwt::{Claims, JwtService};
use crate::common::auth::{AuthError, Identity, Role};

/// Namespaced roles claim used when `ROLES_CLAIM` is not configured.
pub const DEFAULT_ROLES_CLAIM: &str = "https://my-app.example.com/roles";

/// Role value that grants admin access.
const ADMIN_ROLE: &str = "ADMIN";

pub struct IdentityProvider {
    jwt: JwtService,
    roles_claim: String,
}

impl IdentityProvider {
    pub fn new(jwt: JwtService, roles_claim: impl Into<String>) -> Self {
        Self {
            jwt,
            roles_claim: roles_claim.into(),
        }
    }

    /// Verify a session token and produce the caller's identity.
    pub fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.jwt.verify_token(token).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            AuthError::InvalidToken
        })?;

        self.normalize(&claims)
    }

    /// Fold raw claims into an [`Identity`].
    ///
    /// An email is required since authors are keyed by it.
    pub fn normalize(&self, claims: &Claims) -> Result<Identity, AuthError> {
        let email = claims
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        let name = claims
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(email));

        let role = if self.claims_grant_admin(claims) {
            Role::Admin
        } else {
            Role::User
        };

        Ok(Identity::new(claims.sub.clone(), email, &name, role))
    }

    /// Sign a token carrying `roles` in the namespaced claim.
    ///
    /// Used by the developer CLI and tests; production tokens come from the
    /// external provider.
    pub fn issue_token(
        &self,
        subject: &str,
        email: &str,
        name: Option<&str>,
        roles: &[Role],
        ttl: chrono::Duration,
    ) -> Result<String> {
        let mut claims = self.jwt.new_claims(subject, email, ttl);
        claims.name = name.map(str::to_string);
        claims.extra.insert(
            self.roles_claim.clone(),
            Value::Array(roles.iter().map(|r| Value::String(r.to_string())).collect()),
        );

        self.jwt.encode(&claims)
    }

    fn claims_grant_admin(&self, claims: &Claims) -> bool {
        let direct = claims.role.as_deref() == Some(ADMIN_ROLE);
        let namespaced = claims
            .extra
            .get(&self.roles_claim)
            .map(value_grants_admin)
            .unwrap_or(false);

        direct || namespaced
    }
}

/// Whether the caller holds the admin role.
pub fn is_admin(identity: &Identity) -> bool {
    identity.is_admin()
}

fn value_grants_admin(value: &Value) -> bool {
    match value {
        Value::String(role) => role == ADMIN_ROLE,
        Value::Array(roles) => roles.iter().any(|r| r.as_str() == Some(ADMIN_ROLE)),
        _ => false,
    }
}

/// Local part of the email, or "Anonymous" if there is none.
fn fallback_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or("Anonymous")
        .to_string()
}
