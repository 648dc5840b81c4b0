//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::get,
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    admin_delete_blogs_handler, admin_list_blogs_handler, create_blog_handler,
    delete_blog_handler, get_blog_handler, health_handler, history_handler, list_blogs_handler,
    list_users_handler, set_status_handler, stats_handler, update_blog_handler,
    update_user_role_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the router with every route and the non-network middleware.
///
/// Tests drive this directly; `build_app` adds rate limiting on top.
pub fn build_router(deps: ServerDeps) -> Router {
    let identity_provider = deps.identity.clone();
    let app_state = AppState { deps };

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/blogs", get(list_blogs_handler).post(create_blog_handler))
        .route(
            "/blogs/:id",
            get(get_blog_handler)
                .put(update_blog_handler)
                .patch(set_status_handler)
                .delete(delete_blog_handler),
        )
        .route(
            "/admin/blogs",
            get(admin_list_blogs_handler).delete(admin_delete_blogs_handler),
        )
        .route("/admin/stats", get(stats_handler))
        .route(
            "/admin/users",
            get(list_users_handler).patch(update_user_role_handler),
        )
        .route("/history", get(history_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(identity_provider.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the production application
///
/// Rate limiting keys on the client IP taken from X-Forwarded-For, X-Real-IP
/// or Forwarded, falling back to the peer address, so the app must be served
/// with connect info. Responses carry the x-ratelimit headers.
pub fn build_app(deps: ServerDeps, rate_limit_enabled: bool) -> Result<Router> {
    let router = build_router(deps);

    if !rate_limit_enabled {
        tracing::warn!("Rate limiting disabled");
        return Ok(router);
    }

    // Bursts of 20 per IP, one request replenished every 10 seconds
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    Ok(router.layer(GovernorLayer {
        config: rate_limit_config,
    }))
}
