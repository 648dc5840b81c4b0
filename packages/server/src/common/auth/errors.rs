use thiserror::Error;

/// Authentication and authorization failures.
///
/// `AuthenticationRequired` and `InvalidToken` surface as 401, the other
/// variants as 403.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unauthorized")]
    AuthenticationRequired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Admin access required")]
    AdminRequired,
}

impl AuthError {
    /// True when the caller never proved who they are.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AuthError::AuthenticationRequired | AuthError::InvalidToken)
    }
}
