//! Postgres implementations of the store traits.
//!
//! Thin adapters: every query lives on the model types.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{BaseBlogStore, BaseHistoryLog};
use crate::common::{BlogId, Role, UserId};
use crate::domains::blogs::machines::StatusUpdate;
use crate::domains::blogs::models::{
    Author, AuthorWithStats, Blog, BlogQuery, BlogStatus, BlogWithAuthor, ContentChanges, NewBlog,
};
use crate::domains::history::HistoryEvent;

async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database ping failed")?;
    Ok(())
}

// =============================================================================
// PostgresBlogStore
// =============================================================================

#[derive(Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
}

impl PostgresBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseBlogStore for PostgresBlogStore {
    async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }

    async fn find_author_by_email(&self, email: &str) -> Result<Option<Author>> {
        Author::find_by_email(email, &self.pool)
            .await
            .context("Failed to look up author")
    }

    async fn create_author(&self, id: &UserId, email: &str, name: &str) -> Result<Author> {
        Author::create(id, email, name, &self.pool)
            .await
            .context("Failed to create author")
    }

    async fn insert_blog(&self, new: &NewBlog) -> Result<Blog> {
        Blog::create(new, &self.pool)
            .await
            .context("Failed to insert blog")
    }

    async fn find_blog(&self, id: BlogId) -> Result<Option<BlogWithAuthor>> {
        BlogWithAuthor::find_by_id(id, &self.pool)
            .await
            .with_context(|| format!("Failed to load blog {}", id))
    }

    async fn list_blogs(&self, query: &BlogQuery) -> Result<Vec<BlogWithAuthor>> {
        BlogWithAuthor::list(query, &self.pool)
            .await
            .context("Failed to list blogs")
    }

    async fn update_content(&self, id: BlogId, changes: &ContentChanges) -> Result<Option<Blog>> {
        Blog::update_content(id, changes, &self.pool)
            .await
            .with_context(|| format!("Failed to update blog {}", id))
    }

    async fn transition_status(&self, id: BlogId, update: &StatusUpdate) -> Result<Option<Blog>> {
        Blog::transition_status(id, update, &self.pool)
            .await
            .with_context(|| format!("Failed to change status of blog {}", id))
    }

    async fn delete_blog(&self, id: BlogId) -> Result<bool> {
        Blog::delete(id, &self.pool)
            .await
            .with_context(|| format!("Failed to delete blog {}", id))
    }

    async fn delete_all_blogs(&self) -> Result<u64> {
        Blog::delete_all(&self.pool)
            .await
            .context("Failed to delete blogs")
    }

    async fn count_blogs(&self, status: Option<BlogStatus>) -> Result<i64> {
        Blog::count(status, &self.pool)
            .await
            .context("Failed to count blogs")
    }

    async fn count_authors(&self) -> Result<i64> {
        Author::count(&self.pool)
            .await
            .context("Failed to count users")
    }

    async fn list_authors_with_stats(&self) -> Result<Vec<AuthorWithStats>> {
        AuthorWithStats::list(&self.pool)
            .await
            .context("Failed to list users")
    }

    async fn update_author_role(&self, id: &UserId, role: Role) -> Result<Option<Author>> {
        Author::update_role(id, role, &self.pool)
            .await
            .with_context(|| format!("Failed to update role of user {}", id))
    }
}

// =============================================================================
// PostgresHistoryLog
// =============================================================================

#[derive(Clone)]
pub struct PostgresHistoryLog {
    pool: PgPool,
}

impl PostgresHistoryLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseHistoryLog for PostgresHistoryLog {
    async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }

    async fn put(&self, event: &HistoryEvent) -> Result<()> {
        event
            .upsert(&self.pool)
            .await
            .with_context(|| format!("Failed to write history for {}", event.history_id))
    }

    async fn get(&self, application: &str, history_id: &str) -> Result<Option<HistoryEvent>> {
        HistoryEvent::find(application, history_id, &self.pool)
            .await
            .context("Failed to read history")
    }

    // Single statement instead of the default get-then-put.
    async fn update_status(
        &self,
        application: &str,
        history_id: &str,
        status: &str,
        user_email: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<HistoryEvent> {
        let event = HistoryEvent {
            application: application.to_string(),
            history_id: history_id.to_string(),
            created_at,
            updated_at,
            user_email: user_email.to_string(),
            status: status.to_string(),
        };

        event
            .upsert_status(&self.pool)
            .await
            .with_context(|| format!("Failed to update history for {}", history_id))
    }

    async fn query_partition(&self, application: &str) -> Result<Vec<HistoryEvent>> {
        HistoryEvent::find_by_application(application, &self.pool)
            .await
            .context("Failed to query history")
    }
}
