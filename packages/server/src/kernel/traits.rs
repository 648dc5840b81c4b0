// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Moderation rules live in domains/blogs; these traits only move rows.
//
// Naming convention: Base* for trait names (e.g., BaseBlogStore, BaseHistoryLog)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{BlogId, Role, UserId};
use crate::domains::blogs::machines::StatusUpdate;
use crate::domains::blogs::models::{
    Author, AuthorWithStats, Blog, BlogQuery, BlogStatus, BlogWithAuthor, ContentChanges, NewBlog,
};
use crate::domains::history::HistoryEvent;

// =============================================================================
// Blog Record Store (users + blogs)
// =============================================================================

#[async_trait]
pub trait BaseBlogStore: Send + Sync {
    /// Cheap connectivity check for /health
    async fn ping(&self) -> Result<()>;

    async fn find_author_by_email(&self, email: &str) -> Result<Option<Author>>;

    /// Create an author, or re-point the subject's existing row at `email`
    async fn create_author(&self, id: &UserId, email: &str, name: &str) -> Result<Author>;

    /// Insert a blog; the stored status is always PENDING
    async fn insert_blog(&self, new: &NewBlog) -> Result<Blog>;

    async fn find_blog(&self, id: BlogId) -> Result<Option<BlogWithAuthor>>;

    async fn list_blogs(&self, query: &BlogQuery) -> Result<Vec<BlogWithAuthor>>;

    /// Apply content edits; `None` if the blog does not exist
    async fn update_content(&self, id: BlogId, changes: &ContentChanges) -> Result<Option<Blog>>;

    /// Compare-and-set on `update.from`; `None` if the row was not in that
    /// status (or no longer exists)
    async fn transition_status(&self, id: BlogId, update: &StatusUpdate) -> Result<Option<Blog>>;

    /// Returns false if nothing was deleted
    async fn delete_blog(&self, id: BlogId) -> Result<bool>;

    async fn delete_all_blogs(&self) -> Result<u64>;

    async fn count_blogs(&self, status: Option<BlogStatus>) -> Result<i64>;

    async fn count_authors(&self) -> Result<i64>;

    async fn list_authors_with_stats(&self) -> Result<Vec<AuthorWithStats>>;

    async fn update_author_role(&self, id: &UserId, role: Role) -> Result<Option<Author>>;
}

// =============================================================================
// History Log Sink (key/value keyed by (application, history_id))
// =============================================================================

#[async_trait]
pub trait BaseHistoryLog: Send + Sync {
    async fn ping(&self) -> Result<()>;

    /// Insert or replace the record under the event's key
    async fn put(&self, event: &HistoryEvent) -> Result<()>;

    async fn get(&self, application: &str, history_id: &str) -> Result<Option<HistoryEvent>>;

    /// Change status, actor and `updated_at` of a record, creating it with
    /// `created_at` when absent
    async fn update_status(
        &self,
        application: &str,
        history_id: &str,
        status: &str,
        user_email: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<HistoryEvent> {
        let event = match self.get(application, history_id).await? {
            Some(existing) => HistoryEvent {
                status: status.to_string(),
                user_email: user_email.to_string(),
                updated_at,
                ..existing
            },
            None => HistoryEvent {
                application: application.to_string(),
                history_id: history_id.to_string(),
                created_at,
                updated_at,
                user_email: user_email.to_string(),
                status: status.to_string(),
            },
        };

        self.put(&event).await?;
        Ok(event)
    }

    /// Every record in one partition
    async fn query_partition(&self, application: &str) -> Result<Vec<HistoryEvent>>;
}
