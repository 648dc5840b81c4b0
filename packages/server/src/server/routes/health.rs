use std::future::Future;
use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    database: StoreHealth,
    history: StoreHealth,
    /// History writes dropped since startup
    history_failures: u64,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn check<F>(ping: F) -> StoreHealth
where
    F: Future<Output = anyhow::Result<()>>,
{
    match tokio::time::timeout(PING_TIMEOUT, ping).await {
        Ok(Ok(())) => StoreHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => StoreHealth {
            status: "error".to_string(),
            error: Some(format!("Query failed: {}", e)),
        },
        Err(_) => StoreHealth {
            status: "error".to_string(),
            error: Some("Query timeout (>5s)".to_string()),
        },
    }
}

/// Health check endpoint
///
/// Checks:
/// - Blog store connectivity
/// - History log connectivity
///
/// Returns 503 Service Unavailable when the blog store is down. A failing
/// history log only degrades: its writes are best-effort anyway.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let deps = &state.deps;
    let (database, history) = tokio::join!(
        check(deps.blogs.ping()),
        check(deps.history.log().ping())
    );

    let (overall_status, status_code) = match (database.status.as_str(), history.status.as_str()) {
        ("ok", "ok") => ("healthy", StatusCode::OK),
        ("ok", _) => ("degraded", StatusCode::OK),
        _ => ("unhealthy", StatusCode::SERVICE_UNAVAILABLE),
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            database,
            history,
            history_failures: deps.history.failures(),
        }),
    )
}
