use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use typed_builder::TypedBuilder;

use crate::common::{BlogId, UserId};
use crate::domains::blogs::machines::StatusUpdate;

/// Moderation status of a blog post
///
/// Variant order matches the `blog_status` enum in Postgres, which is what
/// `ORDER BY status ASC` sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "blog_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlogStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogStatus::Pending => write!(f, "PENDING"),
            BlogStatus::Approved => write!(f, "APPROVED"),
            BlogStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(BlogStatus::Pending),
            "APPROVED" => Ok(BlogStatus::Approved),
            "REJECTED" => Ok(BlogStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid blog status: {}", s)),
        }
    }
}

/// Blog post row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub slug: String,
    pub category: Option<String>,
    pub author_id: UserId,
    pub status: BlogStatus,
    pub rejection_reason: Option<String>, // only while REJECTED
    pub published_at: Option<DateTime<Utc>>, // only while APPROVED
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog joined with the author's public fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub blog: Blog,
    pub author_name: String,
    pub author_email: String,
}

/// Fields for inserting a blog. Status is not here: new rows are always
/// PENDING.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewBlog {
    #[builder(default = BlogId::new())]
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[builder(default)]
    pub image_url: String,
    pub slug: String,
    #[builder(default)]
    pub category: Option<String>,
    pub author_id: UserId,
}

/// Partial content edit; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl ContentChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to an in-memory row (used by non-SQL stores).
    pub fn apply_to(&self, blog: &mut Blog) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(content) = &self.content {
            blog.content = content.clone();
        }
        if let Some(excerpt) = &self.excerpt {
            blog.excerpt = excerpt.clone();
        }
        if let Some(slug) = &self.slug {
            blog.slug = slug.clone();
        }
        if let Some(image_url) = &self.image_url {
            blog.image_url = image_url.clone();
        }
        if let Some(category) = &self.category {
            blog.category = Some(category.clone());
        }
    }
}

/// Which blogs a listing may include
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogScope {
    /// Everything (admins)
    All,
    /// The user's own blogs plus every approved blog
    VisibleTo(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogOrder {
    /// created_at DESC
    #[default]
    Newest,
    /// status ASC, then created_at DESC (admin moderation queue)
    StatusThenNewest,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct BlogQuery {
    #[builder(default = BlogScope::All)]
    pub scope: BlogScope,
    /// For `VisibleTo` this narrows only the caller's own blogs; approved
    /// blogs by others are always included.
    #[builder(default)]
    pub status: Option<BlogStatus>,
    #[builder(default)]
    pub category: Option<String>,
    #[builder(default)]
    pub order: BlogOrder,
}

impl BlogQuery {
    /// Same predicate as the SQL in [`BlogWithAuthor::list`].
    pub fn matches(&self, blog: &Blog) -> bool {
        let status_ok = self.status.map_or(true, |s| blog.status == s);

        let scope_ok = match &self.scope {
            BlogScope::All => status_ok,
            BlogScope::VisibleTo(user) => {
                (blog.author_id == *user && status_ok) || blog.status == BlogStatus::Approved
            }
        };

        let category_ok = self
            .category
            .as_ref()
            .map_or(true, |c| blog.category.as_ref() == Some(c));

        scope_ok && category_ok
    }

    /// Sort key compatible with the SQL ordering.
    pub fn compare(&self, a: &Blog, b: &Blog) -> std::cmp::Ordering {
        let newest = b
            .created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id));

        match self.order {
            BlogOrder::Newest => newest,
            BlogOrder::StatusThenNewest => a.status.cmp(&b.status).then(newest),
        }
    }
}

const SELECT_WITH_AUTHOR: &str = "SELECT b.*, u.name AS author_name, u.email AS author_email
     FROM blogs b
     JOIN users u ON u.id = b.author_id";

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Blog {
    /// Insert a new PENDING blog
    pub async fn create(new: &NewBlog, pool: &PgPool) -> Result<Self> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (
                id,
                title,
                content,
                excerpt,
                image_url,
                slug,
                category,
                author_id,
                status,
                published_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', NULL)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.excerpt)
        .bind(&new.image_url)
        .bind(&new.slug)
        .bind(&new.category)
        .bind(&new.author_id)
        .fetch_one(pool)
        .await?;

        Ok(blog)
    }

    /// Update content columns, leaving status and published_at alone
    pub async fn update_content(
        id: BlogId,
        changes: &ContentChanges,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                excerpt = COALESCE($4, excerpt),
                slug = COALESCE($5, slug),
                image_url = COALESCE($6, image_url),
                category = COALESCE($7, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(&changes.excerpt)
        .bind(&changes.slug)
        .bind(&changes.image_url)
        .bind(&changes.category)
        .fetch_optional(pool)
        .await?;

        Ok(blog)
    }

    /// Compare-and-set status change.
    ///
    /// Only applies if the row is still in `update.from`; returns `None` when
    /// another request got there first (or the row is gone).
    pub async fn transition_status(
        id: BlogId,
        update: &StatusUpdate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
            SET status = $2,
                rejection_reason = $3,
                published_at = $4,
                updated_at = NOW()
            WHERE id = $1 AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.to)
        .bind(&update.rejection_reason)
        .bind(update.published_at)
        .bind(update.from)
        .fetch_optional(pool)
        .await?;

        Ok(blog)
    }

    /// Delete one blog; false if it did not exist
    pub async fn delete(id: BlogId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM blogs").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Count blogs, optionally in a single status
    pub async fn count(status: Option<BlogStatus>, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM blogs WHERE ($1::blog_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

impl BlogWithAuthor {
    pub async fn find_by_id(id: BlogId, pool: &PgPool) -> Result<Option<Self>> {
        let blog = sqlx::query_as::<_, BlogWithAuthor>(&format!("{} WHERE b.id = $1", SELECT_WITH_AUTHOR))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(blog)
    }

    /// Run a scoped, filtered, ordered listing
    pub async fn list(query: &BlogQuery, pool: &PgPool) -> Result<Vec<Self>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_WITH_AUTHOR);
        builder.push(" WHERE TRUE");

        match &query.scope {
            BlogScope::All => {
                if let Some(status) = query.status {
                    builder.push(" AND b.status = ").push_bind(status);
                }
            }
            BlogScope::VisibleTo(user) => {
                builder.push(" AND ((b.author_id = ").push_bind(user.clone());
                if let Some(status) = query.status {
                    builder.push(" AND b.status = ").push_bind(status);
                }
                builder
                    .push(") OR b.status = ")
                    .push_bind(BlogStatus::Approved)
                    .push(")");
            }
        }

        if let Some(category) = &query.category {
            builder.push(" AND b.category = ").push_bind(category.clone());
        }

        builder.push(match query.order {
            BlogOrder::Newest => " ORDER BY b.created_at DESC, b.id DESC",
            BlogOrder::StatusThenNewest => " ORDER BY b.status ASC, b.created_at DESC, b.id DESC",
        });

        let blogs = builder
            .build_query_as::<BlogWithAuthor>()
            .fetch_all(pool)
            .await?;
        Ok(blogs)
    }
}
