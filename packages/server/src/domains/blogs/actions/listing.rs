//! Blog listing actions

use crate::common::utils::non_blank;
use crate::common::{Actor, Capability, Identity};
use crate::domains::blogs::errors::{BlogError, BlogResult};
use crate::domains::blogs::models::{BlogOrder, BlogQuery, BlogScope, BlogStatus, BlogWithAuthor};
use crate::kernel::ServerDeps;

/// Parse a `?status=` filter. Absent, empty, or `ALL` mean no filter.
pub fn parse_status_filter(raw: Option<&str>) -> BlogResult<Option<BlogStatus>> {
    match non_blank(raw) {
        None | Some("ALL") => Ok(None),
        Some(value) => value
            .parse::<BlogStatus>()
            .map(Some)
            .map_err(|_| BlogError::validation(format!("Invalid status filter: {}", value))),
    }
}

/// Blogs visible to the caller, newest first.
///
/// Admins see everything. Everyone else sees their own blogs (narrowed by
/// `status` when given) plus every approved blog.
pub async fn list_blogs(
    identity: &Identity,
    status: Option<&str>,
    category: Option<&str>,
    deps: &ServerDeps,
) -> BlogResult<Vec<BlogWithAuthor>> {
    let status = parse_status_filter(status)?;

    let scope = if identity.is_admin() {
        BlogScope::All
    } else {
        BlogScope::VisibleTo(identity.subject_id.clone())
    };

    let query = BlogQuery::builder()
        .scope(scope)
        .status(status)
        .category(non_blank(category).map(str::to_string))
        .build();

    Ok(deps.blogs.list_blogs(&query).await?)
}

/// Moderation queue: every blog ordered PENDING, APPROVED, REJECTED, then
/// newest first (admin only)
pub async fn admin_list_blogs(
    identity: &Identity,
    status: Option<&str>,
    deps: &ServerDeps,
) -> BlogResult<Vec<BlogWithAuthor>> {
    Actor::new(identity).can(Capability::ManageAllBlogs).check()?;

    let query = BlogQuery::builder()
        .status(parse_status_filter(status)?)
        .order(BlogOrder::StatusThenNewest)
        .build();

    Ok(deps.blogs.list_blogs(&query).await?)
}
