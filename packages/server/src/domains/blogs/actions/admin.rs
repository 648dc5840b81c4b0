//! Admin-only actions: bulk deletes, stats, user management

use tracing::{info, warn};

use crate::common::{Actor, BlogId, Capability, Identity, Role, UserId};
use crate::domains::blogs::data::StatsData;
use crate::domains::blogs::errors::{BlogError, BlogResult};
use crate::domains::blogs::models::{Author, AuthorWithStats, BlogStatus};
use crate::kernel::ServerDeps;

/// Delete any blog by id
pub async fn admin_delete_blog(id: BlogId, identity: &Identity, deps: &ServerDeps) -> BlogResult<()> {
    Actor::new(identity).can(Capability::ManageAllBlogs).check()?;

    if !deps.blogs.delete_blog(id).await? {
        return Err(BlogError::NotFound);
    }

    info!(blog_id = %id, admin = %identity.email, "Blog deleted by admin");
    Ok(())
}

/// Delete every blog, returning how many were removed
pub async fn delete_all_blogs(identity: &Identity, deps: &ServerDeps) -> BlogResult<u64> {
    Actor::new(identity).can(Capability::ManageAllBlogs).check()?;

    let count = deps.blogs.delete_all_blogs().await?;

    warn!(count = count, admin = %identity.email, "All blogs deleted");
    Ok(count)
}

/// Aggregate user and blog counts
pub async fn stats(identity: &Identity, deps: &ServerDeps) -> BlogResult<StatsData> {
    Actor::new(identity).can(Capability::ViewStats).check()?;

    let store = &deps.blogs;
    let (total_users, total_blogs, pending_blogs, approved_blogs, rejected_blogs) = tokio::try_join!(
        store.count_authors(),
        store.count_blogs(None),
        store.count_blogs(Some(BlogStatus::Pending)),
        store.count_blogs(Some(BlogStatus::Approved)),
        store.count_blogs(Some(BlogStatus::Rejected)),
    )?;

    Ok(StatsData {
        total_users,
        total_blogs,
        pending_blogs,
        approved_blogs,
        rejected_blogs,
    })
}

/// Every author with per-status counts, newest account first
pub async fn list_users(identity: &Identity, deps: &ServerDeps) -> BlogResult<Vec<AuthorWithStats>> {
    Actor::new(identity).can(Capability::ManageUsers).check()?;

    Ok(deps.blogs.list_authors_with_stats().await?)
}

/// Change a user's stored role.
///
/// This is reporting data: request authorization keeps following the
/// caller's token.
pub async fn update_user_role(
    user_id: &UserId,
    role: Role,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<Author> {
    Actor::new(identity).can(Capability::ManageUsers).check()?;

    let author = deps
        .blogs
        .update_author_role(user_id, role)
        .await?
        .ok_or(BlogError::UserNotFound)?;

    info!(user_id = %user_id, role = %role, admin = %identity.email, "User role updated");
    Ok(author)
}
