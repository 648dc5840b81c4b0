use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::common::{AuthError, Identity};
use crate::domains::auth::IdentityProvider;
use crate::server::error::ApiError;

/// JWT authentication middleware
///
/// Extracts the bearer token from the Authorization header, resolves it to
/// an `Identity`, and adds that to the request extensions. Missing or
/// invalid tokens leave the request anonymous; handlers that need a caller
/// reject it with 401.
pub async fn jwt_auth_middleware(
    identity_provider: Arc<IdentityProvider>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_identity(&request, &identity_provider) {
        Some(identity) => {
            debug!(
                user_id = %identity.subject_id,
                admin = identity.is_admin(),
                "Authenticated request"
            );
            request.extensions_mut().insert(identity);
        }
        None => debug!("No valid authentication token"),
    }

    next.run(request).await
}

/// Extract and verify the token from a request
fn extract_identity(
    request: &axum::http::Request<axum::body::Body>,
    identity_provider: &IdentityProvider,
) -> Option<Identity> {
    let auth_header = request.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();

    identity_provider.resolve(token).ok()
}

/// Extractor for handlers that require a caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AuthError::AuthenticationRequired.into())
    }
}

/// Extractor for handlers where a caller is optional
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Identity>().cloned()))
    }
}
