//! Request and response shapes for the blog HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{AuthorWithStats, BlogStatus, BlogWithAuthor};
use crate::common::{BlogId, Role, UserId};

/// Body of `POST /blogs`. Any `status` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(alias = "image_url")]
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// Body of `PUT /blogs/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    #[serde(alias = "image_url")]
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Admin only
    pub status: Option<BlogStatus>,
    pub rejection_reason: Option<String>,
}

/// Body of `PATCH /blogs/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusInput {
    pub status: BlogStatus,
    pub rejection_reason: Option<String>,
}

/// Body of `PATCH /admin/users`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleInput {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub email: String,
}

/// API representation of a blog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogData {
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub slug: String,
    pub category: Option<String>,
    pub status: BlogStatus,
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: UserId,
    pub author: AuthorData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogWithAuthor> for BlogData {
    fn from(row: BlogWithAuthor) -> Self {
        let blog = row.blog;
        Self {
            id: blog.id,
            title: blog.title,
            content: blog.content,
            excerpt: blog.excerpt,
            image_url: blog.image_url,
            slug: blog.slug,
            category: blog.category,
            status: blog.status,
            rejection_reason: blog.rejection_reason,
            published_at: blog.published_at,
            author_id: blog.author_id,
            author: AuthorData {
                name: row.author_name,
                email: row.author_email,
            },
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_users: i64,
    pub total_blogs: i64,
    pub pending_blogs: i64,
    pub approved_blogs: i64,
    pub rejected_blogs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStatsData {
    pub total_blogs: i64,
    pub approved_blogs: i64,
    pub rejected_blogs: i64,
    pub pending_blogs: i64,
}

/// API representation of a user in the admin user list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AuthorStatsData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

impl From<AuthorWithStats> for UserData {
    fn from(row: AuthorWithStats) -> Self {
        let stats = AuthorStatsData {
            total_blogs: row.total_blogs(),
            approved_blogs: row.approved_blogs,
            rejected_blogs: row.rejected_blogs,
            pending_blogs: row.pending_blogs,
        };
        let author = row.author;
        Self {
            id: author.id,
            email: author.email,
            name: author.name,
            role: author.role,
            created_at: author.created_at,
            updated_at: author.updated_at,
            stats: Some(stats),
            last_active: Some(row.last_active),
        }
    }
}

impl From<super::models::Author> for UserData {
    fn from(author: super::models::Author) -> Self {
        Self {
            id: author.id,
            email: author.email,
            name: author.name,
            role: author.role,
            created_at: author.created_at,
            updated_at: author.updated_at,
            stats: None,
            last_active: None,
        }
    }
}
