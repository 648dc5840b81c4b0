//! Blog CRUD actions

use chrono::Utc;
use tracing::info;

use super::moderation::apply_transition;
use crate::common::utils::{default_excerpt, non_blank, slugify};
use crate::common::{Actor, AuthError, BlogId, Capability, Identity};
use crate::domains::blogs::data::{CreateBlogInput, UpdateBlogInput};
use crate::domains::blogs::errors::{BlogError, BlogResult};
use crate::domains::blogs::machines::plan_transition;
use crate::domains::blogs::models::{Author, BlogStatus, BlogWithAuthor, ContentChanges, NewBlog};
use crate::kernel::ServerDeps;

/// Find the caller's author row by email, creating it on first submission.
///
/// A subject seen before under another email keeps its row, now under the
/// new email.
async fn ensure_author(identity: &Identity, deps: &ServerDeps) -> BlogResult<Author> {
    if let Some(author) = deps.blogs.find_author_by_email(&identity.email).await? {
        return Ok(author);
    }

    info!(user_id = %identity.subject_id, email = %identity.email, "Creating author");
    let author = deps
        .blogs
        .create_author(&identity.subject_id, &identity.email, &identity.name)
        .await?;
    Ok(author)
}

/// Submit a new blog. Always stored as PENDING.
pub async fn create_blog(
    input: CreateBlogInput,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    if non_blank(Some(&input.title)).is_none() || non_blank(Some(&input.content)).is_none() {
        return Err(BlogError::validation("Title and content are required"));
    }

    let author = ensure_author(identity, deps).await?;

    let excerpt = non_blank(input.excerpt.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| default_excerpt(&input.title));

    let new_blog = NewBlog::builder()
        .slug(slugify(&input.title))
        .excerpt(excerpt)
        .title(input.title)
        .content(input.content)
        .image_url(input.image_url.unwrap_or_default())
        .category(non_blank(input.category.as_deref()).map(str::to_string))
        .author_id(author.id.clone())
        .build();

    let blog = deps.blogs.insert_blog(&new_blog).await?;

    info!(blog_id = %blog.id, author_id = %blog.author_id, slug = %blog.slug, "Blog submitted");

    deps.history.record_created(&blog, &identity.email).await;

    Ok(BlogWithAuthor {
        blog,
        author_name: author.name,
        author_email: author.email,
    })
}

/// Read one blog.
///
/// Approved blogs are public. Anything else needs the author or an admin.
pub async fn get_blog(
    id: BlogId,
    identity: Option<&Identity>,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    let blog = deps.blogs.find_blog(id).await?.ok_or(BlogError::NotFound)?;

    if blog.blog.status == BlogStatus::Approved {
        return Ok(blog);
    }

    let identity = identity.ok_or(AuthError::AuthenticationRequired)?;
    Actor::new(identity)
        .can(Capability::ViewUnpublishedBlog {
            author_id: &blog.blog.author_id,
        })
        .check()?;

    Ok(blog)
}

/// Edit content fields, and for admins optionally the status.
///
/// The status change is planned and applied before the content is written,
/// so an invalid or lost transition leaves the content untouched too.
pub async fn update_blog(
    id: BlogId,
    input: UpdateBlogInput,
    identity: &Identity,
    deps: &ServerDeps,
) -> BlogResult<BlogWithAuthor> {
    let existing = deps.blogs.find_blog(id).await?.ok_or(BlogError::NotFound)?;

    Actor::new(identity)
        .can(Capability::EditBlog {
            author_id: &existing.blog.author_id,
        })
        .check()?;

    let transition = match input.status {
        Some(target) => {
            Actor::new(identity).can(Capability::ModerateBlogs).check()?;
            Some(plan_transition(
                existing.blog.status,
                target,
                input.rejection_reason.as_deref(),
                Utc::now(),
            )?)
        }
        None => None,
    };

    for (field, value) in [("Title", &input.title), ("Content", &input.content)] {
        if value.is_some() && non_blank(value.as_deref()).is_none() {
            return Err(BlogError::validation(format!("{} cannot be empty", field)));
        }
    }

    let changes = ContentChanges {
        title: input.title,
        content: input.content,
        excerpt: input.excerpt,
        slug: input.slug,
        image_url: input.image_url,
        category: input.category,
    };

    // Status first: a lost compare-and-set must leave the content untouched
    let mut current = match transition {
        Some(transition) => apply_transition(existing, transition, identity, deps).await?,
        None => existing,
    };

    if !changes.is_empty() {
        let blog = deps
            .blogs
            .update_content(id, &changes)
            .await?
            .ok_or(BlogError::NotFound)?;
        info!(blog_id = %id, editor = %identity.subject_id, "Blog content updated");
        current.blog = blog;
    }

    Ok(current)
}

/// Delete one blog as its author or an admin
pub async fn delete_blog(id: BlogId, identity: &Identity, deps: &ServerDeps) -> BlogResult<()> {
    let existing = deps.blogs.find_blog(id).await?.ok_or(BlogError::NotFound)?;

    Actor::new(identity)
        .can(Capability::DeleteBlog {
            author_id: &existing.blog.author_id,
        })
        .check()?;

    if !deps.blogs.delete_blog(id).await? {
        return Err(BlogError::NotFound);
    }

    info!(blog_id = %id, deleted_by = %identity.subject_id, "Blog deleted");
    Ok(())
}
