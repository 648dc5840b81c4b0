use axum::{extract::Extension, Json};

use crate::domains::history::{list_history, HistoryEvent};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::CurrentUser;

/// GET /history
pub async fn history_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<Vec<HistoryEvent>>> {
    Ok(Json(list_history(&identity, &state.deps).await?))
}
