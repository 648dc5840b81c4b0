//! `/admin/*` handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::blogs::{parse_blog_id, BlogListResponse};
use crate::common::{Actor, BlogId, Capability};
use crate::domains::blogs::actions;
use crate::domains::blogs::data::{BlogData, StatsData, UpdateRoleInput, UserData};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::CurrentUser;

#[derive(Debug, Default, Deserialize)]
pub struct AdminListParams {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDeleteParams {
    pub blog_id: Option<String>,
    pub delete_all: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDeleteResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_id: Option<BlogId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserData>,
}

/// GET /admin/blogs?status=
pub async fn admin_list_blogs_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    params: Result<Query<AdminListParams>, QueryRejection>,
) -> ApiResult<Json<BlogListResponse>> {
    let Query(params) = params?;
    let blogs = actions::admin_list_blogs(&identity, params.status.as_deref(), &state.deps).await?;

    Ok(Json(BlogListResponse {
        blogs: blogs.into_iter().map(BlogData::from).collect(),
    }))
}

/// DELETE /admin/blogs?blogId= or ?deleteAll=true
pub async fn admin_delete_blogs_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    params: Result<Query<AdminDeleteParams>, QueryRejection>,
) -> ApiResult<Json<AdminDeleteResponse>> {
    // Admin check comes before parameter validation
    Actor::new(&identity).can(Capability::ManageAllBlogs).check()?;
    let Query(params) = params?;

    if params.delete_all.as_deref() == Some("true") {
        let count = actions::delete_all_blogs(&identity, &state.deps).await?;
        return Ok(Json(AdminDeleteResponse {
            message: "All blogs deleted successfully".to_string(),
            blog_id: None,
            count: Some(count),
        }));
    }

    let Some(raw_id) = params.blog_id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::bad_request(
            "Blog ID or deleteAll parameter is required",
        ));
    };

    let id = parse_blog_id(&raw_id)?;
    actions::admin_delete_blog(id, &identity, &state.deps).await?;

    Ok(Json(AdminDeleteResponse {
        message: "Blog deleted successfully".to_string(),
        blog_id: Some(id),
        count: None,
    }))
}

/// GET /admin/stats
pub async fn stats_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<StatsData>> {
    Ok(Json(actions::stats(&identity, &state.deps).await?))
}

/// GET /admin/users
pub async fn list_users_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<UserListResponse>> {
    let users = actions::list_users(&identity, &state.deps).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserData::from).collect(),
    }))
}

/// PATCH /admin/users with `{userId, role}`
pub async fn update_user_role_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    body: Result<Json<UpdateRoleInput>, JsonRejection>,
) -> ApiResult<Json<UserData>> {
    let Json(input) = body?;
    let author =
        actions::update_user_role(&input.user_id, input.role, &identity, &state.deps).await?;
    Ok(Json(author.into()))
}
