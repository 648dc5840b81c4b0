//! `/blogs` handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::BlogId;
use crate::domains::blogs::actions;
use crate::domains::blogs::data::{BlogData, CreateBlogInput, SetStatusInput, UpdateBlogInput};
use crate::domains::blogs::BlogError;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::{CurrentUser, MaybeUser};

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub blog: BlogData,
}

#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub blogs: Vec<BlogData>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBlogsParams {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Unparseable ids cannot name an existing blog.
pub(crate) fn parse_blog_id(raw: &str) -> Result<BlogId, BlogError> {
    BlogId::parse(raw).map_err(|_| BlogError::NotFound)
}

/// POST /blogs
pub async fn create_blog_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    body: Result<Json<CreateBlogInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BlogResponse>)> {
    let Json(input) = body?;
    let blog = actions::create_blog(input, &identity, &state.deps).await?;

    Ok((
        StatusCode::CREATED,
        Json(BlogResponse { blog: blog.into() }),
    ))
}

/// GET /blogs?status=&category=
pub async fn list_blogs_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    params: Result<Query<ListBlogsParams>, QueryRejection>,
) -> ApiResult<Json<BlogListResponse>> {
    let Query(params) = params?;
    let blogs = actions::list_blogs(
        &identity,
        params.status.as_deref(),
        params.category.as_deref(),
        &state.deps,
    )
    .await?;

    Ok(Json(BlogListResponse {
        blogs: blogs.into_iter().map(BlogData::from).collect(),
    }))
}

/// GET /blogs/{id}
pub async fn get_blog_handler(
    Extension(state): Extension<AppState>,
    MaybeUser(identity): MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogData>> {
    let id = parse_blog_id(&id)?;
    let blog = actions::get_blog(id, identity.as_ref(), &state.deps).await?;
    Ok(Json(blog.into()))
}

/// PUT /blogs/{id}
pub async fn update_blog_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateBlogInput>, JsonRejection>,
) -> ApiResult<Json<BlogData>> {
    let id = parse_blog_id(&id)?;
    let Json(input) = body?;
    let blog = actions::update_blog(id, input, &identity, &state.deps).await?;
    Ok(Json(blog.into()))
}

/// PATCH /blogs/{id} with `{status, rejectionReason?}`
pub async fn set_status_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<SetStatusInput>, JsonRejection>,
) -> ApiResult<Json<BlogResponse>> {
    let id = parse_blog_id(&id)?;
    let Json(input) = body?;
    let blog = actions::set_status(
        id,
        input.status,
        input.rejection_reason.as_deref(),
        &identity,
        &state.deps,
    )
    .await?;

    Ok(Json(BlogResponse { blog: blog.into() }))
}

/// DELETE /blogs/{id}
pub async fn delete_blog_handler(
    Extension(state): Extension<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_blog_id(&id)?;
    actions::delete_blog(id, &identity, &state.deps).await?;

    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".to_string(),
    }))
}
