//! Approve / reject actions

use chrono::Utc;
use tracing::{debug, info};

use crate::common::{Actor, BlogId, Capability, Identity};
use crate::domains::blogs::errors::{BlogError, BlogResult};
use crate::domains::blogs::machines::{plan_transition, Transition};
use crate::domains::blogs::models::{BlogStatus, BlogWithAuthor};
use crate::kernel::ServerDeps;

/// Approve a pending blog (admin only)
pub async fn approve_blog(
    id: BlogId,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    set_status(id, BlogStatus::Approved, None, identity, deps).await
}

/// Reject a pending blog with a reason (admin only)
pub async fn reject_blog(
    id: BlogId,
    reason: Option<&str>,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    set_status(id, BlogStatus::Rejected, reason, identity, deps).await
}

/// Move a blog to `target` if the transition table allows it.
///
/// Requesting the status the blog already has returns it unchanged and
/// writes no history.
pub async fn set_status(
    id: BlogId,
    target: BlogStatus,
    reason: Option<&str>,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    Actor::new(identity).can(Capability::ModerateBlogs).check()?;

    let existing = deps.blogs.find_blog(id).await?.ok_or(BlogError::NotFound)?;
    let transition = plan_transition(existing.blog.status, target, reason, Utc::now())?;

    apply_transition(existing, transition, identity, deps).await
}

/// Write a planned transition with compare-and-set and record history.
///
/// If another request changed the status first, re-read: a blog already in
/// the target status is returned as is, anything else is an invalid
/// transition.
pub(crate) async fn apply_transition(
    existing: BlogWithAuthor,
    transition: Transition,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    let update = match transition {
        Transition::Unchanged => {
            debug!(blog_id = %existing.blog.id, status = %existing.blog.status, "Status unchanged");
            return Ok(existing);
        }
        Transition::Apply(update) => update,
    };

    let id = existing.blog.id;
    match deps.blogs.transition_status(id, &update).await? {
        Some(blog) => {
            info!(
                blog_id = %id,
                from = %update.from,
                to = %update.to,
                moderator = %identity.email,
                "Blog status changed"
            );
            deps.history.record_status_change(&blog, &identity.email).await;

            Ok(BlogWithAuthor { blog, ..existing })
        }
        None => {
            let current = deps.blogs.find_blog(id).await?.ok_or(BlogError::NotFound)?;
            if current.blog.status == update.to {
                debug!(blog_id = %id, status = %update.to, "Status already applied by another request");
                Ok(current)
            } else {
                Err(BlogError::InvalidTransition {
                    from: current.blog.status,
                    to: update.to,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Identity, Role};
    use crate::domains::blogs::actions::create_blog;
    use crate::domains::blogs::data::CreateBlogInput;
    use crate::kernel::TestDependencies;

    fn admin() -> Identity {
        Identity::new("auth0|admin", "admin@example.com", "Admin", Role::Admin)
    }

    fn author() -> Identity {
        Identity::new("auth0|author", "author@example.com", "Author", Role::User)
    }

    async fn pending_blog(deps: &ServerDeps) -> BlogWithAuthor {
        let input = CreateBlogInput {
            title: "Race".to_string(),
            content: "Body".to_string(),
            ..Default::default()
        };
        create_blog(input, &author(), deps).await.unwrap()
    }

    #[tokio::test]
    async fn test_losing_compare_and_set_returns_target_state() {
        let test_deps = TestDependencies::new();
        let history = test_deps.history.clone();
        let deps = test_deps.into_deps();

        let stale = pending_blog(&deps).await;
        let plan = plan_transition(stale.blog.status, BlogStatus::Approved, None, Utc::now()).unwrap();

        // Another moderator wins the race
        approve_blog(stale.blog.id, &admin(), &deps).await.unwrap();
        assert_eq!(history.write_count(), 2);

        let result = apply_transition(stale, plan, &admin(), &deps).await.unwrap();

        assert_eq!(result.blog.status, BlogStatus::Approved);
        assert_eq!(history.write_count(), 2);
    }

    #[tokio::test]
    async fn test_losing_compare_and_set_to_other_status_is_invalid() {
        let deps = TestDependencies::new().into_deps();

        let stale = pending_blog(&deps).await;
        let plan = plan_transition(stale.blog.status, BlogStatus::Approved, None, Utc::now()).unwrap();

        reject_blog(stale.blog.id, Some("No"), &admin(), &deps)
            .await
            .unwrap();

        let err = apply_transition(stale, plan, &admin(), &deps).await.unwrap_err();
        assert!(matches!(
            err,
            BlogError::InvalidTransition {
                from: BlogStatus::Rejected,
                to: BlogStatus::Approved
            }
        ));
    }

    #[tokio::test]
    async fn test_losing_compare_and_set_on_deleted_blog_is_not_found() {
        let deps = TestDependencies::new().into_deps();

        let stale = pending_blog(&deps).await;
        let plan = plan_transition(stale.blog.status, BlogStatus::Approved, None, Utc::now()).unwrap();
        deps.blogs.delete_blog(stale.blog.id).await.unwrap();

        let err = apply_transition(stale, plan, &admin(), &deps).await.unwrap_err();
        assert!(matches!(err, BlogError::NotFound));
    }
}
