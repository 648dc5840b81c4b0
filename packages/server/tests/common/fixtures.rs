//! Test fixtures for identities and blogs.
//!
//! Blogs are created through the workflow actions so history and author
//! rows look exactly like production.

use moderation_core::common::{BlogId, Identity, Role};
use moderation_core::domains::blogs::actions;
use moderation_core::domains::blogs::data::CreateBlogInput;
use moderation_core::domains::blogs::BlogWithAuthor;
use moderation_core::kernel::ServerDeps;

pub fn alice() -> Identity {
    Identity::new("auth0|alice", "alice@example.com", "Alice", Role::User)
}

pub fn bob() -> Identity {
    Identity::new("auth0|bob", "bob@example.com", "Bob", Role::User)
}

pub fn admin() -> Identity {
    Identity::new("auth0|admin", "admin@example.com", "Admin", Role::Admin)
}

pub fn blog_input(title: &str, content: &str) -> CreateBlogInput {
    CreateBlogInput {
        title: title.to_string(),
        content: content.to_string(),
        ..Default::default()
    }
}

/// Create a PENDING blog authored by `author`
pub async fn create_pending(deps: &ServerDeps, author: &Identity, title: &str) -> BlogId {
    actions::create_blog(blog_input(title, "Body text"), author, deps)
        .await
        .expect("Failed to create blog")
        .blog
        .id
}

/// Create a blog and approve it as admin
pub async fn create_approved(deps: &ServerDeps, author: &Identity, title: &str) -> BlogId {
    let id = create_pending(deps, author, title).await;
    actions::approve_blog(id, &admin(), deps)
        .await
        .expect("Failed to approve blog");
    id
}

/// Create a blog and reject it as admin
pub async fn create_rejected(deps: &ServerDeps, author: &Identity, title: &str) -> BlogId {
    let id = create_pending(deps, author, title).await;
    actions::reject_blog(id, Some("Needs work"), &admin(), deps)
        .await
        .expect("Failed to reject blog");
    id
}

pub fn titles(blogs: &[BlogWithAuthor]) -> Vec<String> {
    blogs.iter().map(|b| b.blog.title.clone()).collect()
}
