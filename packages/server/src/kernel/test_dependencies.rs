// TestDependencies - in-memory implementations for testing
//
// Provides stores that can be injected into ServerDeps for tests, plus
// switches for simulating infrastructure failures.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseBlogStore, BaseHistoryLog, ServerDeps};
use crate::common::{BlogId, Role, UserId};
use crate::domains::auth::{IdentityProvider, JwtService, DEFAULT_ROLES_CLAIM};
use crate::domains::blogs::machines::StatusUpdate;
use crate::domains::blogs::models::{
    Author, AuthorWithStats, Blog, BlogQuery, BlogStatus, BlogWithAuthor, ContentChanges, NewBlog,
};
use crate::domains::history::HistoryEvent;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "moderation-server-test";

// =============================================================================
// In-memory Blog Store
// =============================================================================

#[derive(Default)]
struct BlogTables {
    authors: Vec<Author>,
    blogs: Vec<Blog>,
}

impl BlogTables {
    fn with_author(&self, blog: &Blog) -> Result<BlogWithAuthor> {
        let author = self
            .authors
            .iter()
            .find(|a| a.id == blog.author_id)
            .ok_or_else(|| anyhow::anyhow!("blog {} references missing author", blog.id))?;

        Ok(BlogWithAuthor {
            blog: blog.clone(),
            author_name: author.name.clone(),
            author_email: author.email.clone(),
        })
    }
}

pub struct InMemoryBlogStore {
    tables: Mutex<BlogTables>,
    failing: AtomicBool,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BlogTables::default()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every call fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Raw rows, for assertions
    pub fn blogs(&self) -> Vec<Blog> {
        self.tables.lock().unwrap().blogs.clone()
    }

    pub fn authors(&self) -> Vec<Author> {
        self.tables.lock().unwrap().authors.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("blog store unavailable");
        }
        Ok(())
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseBlogStore for InMemoryBlogStore {
    async fn ping(&self) -> Result<()> {
        self.check()
    }

    async fn find_author_by_email(&self, email: &str) -> Result<Option<Author>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.authors.iter().find(|a| a.email == email).cloned())
    }

    async fn create_author(&self, id: &UserId, email: &str, name: &str) -> Result<Author> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = tables.authors.iter_mut().find(|a| a.id == *id) {
            existing.email = email.to_string();
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        if tables.authors.iter().any(|a| a.email == email) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }

        let author = Author {
            id: id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        tables.authors.push(author.clone());
        Ok(author)
    }

    async fn insert_blog(&self, new: &NewBlog) -> Result<Blog> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.authors.iter().any(|a| a.id == new.author_id) {
            anyhow::bail!("author {} does not exist", new.author_id);
        }

        let now = Utc::now();
        let blog = Blog {
            id: new.id,
            title: new.title.clone(),
            content: new.content.clone(),
            excerpt: new.excerpt.clone(),
            image_url: new.image_url.clone(),
            slug: new.slug.clone(),
            category: new.category.clone(),
            author_id: new.author_id.clone(),
            status: BlogStatus::Pending,
            rejection_reason: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn find_blog(&self, id: BlogId) -> Result<Option<BlogWithAuthor>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        tables
            .blogs
            .iter()
            .find(|b| b.id == id)
            .map(|b| tables.with_author(b))
            .transpose()
    }

    async fn list_blogs(&self, query: &BlogQuery) -> Result<Vec<BlogWithAuthor>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut blogs: Vec<&Blog> = tables.blogs.iter().filter(|b| query.matches(b)).collect();
        blogs.sort_by(|a, b| query.compare(a, b));
        blogs.into_iter().map(|b| tables.with_author(b)).collect()
    }

    async fn update_content(&self, id: BlogId, changes: &ContentChanges) -> Result<Option<Blog>> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            changes.apply_to(blog);
            blog.updated_at = Utc::now();
            blog.clone()
        }))
    }

    async fn transition_status(&self, id: BlogId, update: &StatusUpdate) -> Result<Option<Blog>> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .blogs
            .iter_mut()
            .find(|b| b.id == id && b.status == update.from)
            .map(|blog| {
                blog.status = update.to;
                blog.rejection_reason = update.rejection_reason.clone();
                blog.published_at = update.published_at;
                blog.updated_at = Utc::now();
                blog.clone()
            }))
    }

    async fn delete_blog(&self, id: BlogId) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.blogs.len();
        tables.blogs.retain(|b| b.id != id);
        Ok(tables.blogs.len() < before)
    }

    async fn delete_all_blogs(&self) -> Result<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let count = tables.blogs.len() as u64;
        tables.blogs.clear();
        Ok(count)
    }

    async fn count_blogs(&self, status: Option<BlogStatus>) -> Result<i64> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let count = tables
            .blogs
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .count();
        Ok(count as i64)
    }

    async fn count_authors(&self) -> Result<i64> {
        self.check()?;
        Ok(self.tables.lock().unwrap().authors.len() as i64)
    }

    async fn list_authors_with_stats(&self) -> Result<Vec<AuthorWithStats>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<AuthorWithStats> = tables
            .authors
            .iter()
            .map(|author| {
                let own: Vec<&Blog> = tables
                    .blogs
                    .iter()
                    .filter(|b| b.author_id == author.id)
                    .collect();
                let count = |status: BlogStatus| own.iter().filter(|b| b.status == status).count() as i64;

                AuthorWithStats {
                    author: author.clone(),
                    approved_blogs: count(BlogStatus::Approved),
                    rejected_blogs: count(BlogStatus::Rejected),
                    pending_blogs: count(BlogStatus::Pending),
                    last_active: own
                        .iter()
                        .map(|b| b.created_at)
                        .max()
                        .unwrap_or(author.created_at),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.author
                .created_at
                .cmp(&a.author.created_at)
                .then_with(|| a.author.id.cmp(&b.author.id))
        });
        Ok(rows)
    }

    async fn update_author_role(&self, id: &UserId, role: Role) -> Result<Option<Author>> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.authors.iter_mut().find(|a| a.id == *id).map(|author| {
            author.role = role;
            author.updated_at = Utc::now();
            author.clone()
        }))
    }
}

// =============================================================================
// In-memory History Log
// =============================================================================

pub struct InMemoryHistoryLog {
    records: Mutex<BTreeMap<(String, String), HistoryEvent>>,
    writes: Mutex<Vec<HistoryEvent>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryHistoryLog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay: Mutex::new(None),
        }
    }

    /// Make every write fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sleep this long before each write
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Every successful write, in order
    pub fn writes(&self) -> Vec<HistoryEvent> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn record(&self, history_id: &str) -> Option<HistoryEvent> {
        self.records
            .lock()
            .unwrap()
            .values()
            .find(|e| e.history_id == history_id)
            .cloned()
    }

    async fn before_write(&self) -> Result<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("history log unavailable");
        }
        Ok(())
    }
}

impl Default for InMemoryHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseHistoryLog for InMemoryHistoryLog {
    async fn ping(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("history log unavailable");
        }
        Ok(())
    }

    async fn put(&self, event: &HistoryEvent) -> Result<()> {
        self.before_write().await?;
        self.records.lock().unwrap().insert(
            (event.application.clone(), event.history_id.clone()),
            event.clone(),
        );
        self.writes.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn get(&self, application: &str, history_id: &str) -> Result<Option<HistoryEvent>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(application.to_string(), history_id.to_string()))
            .cloned())
    }

    async fn query_partition(&self, application: &str) -> Result<Vec<HistoryEvent>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.application == application)
            .cloned()
            .collect())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub blogs: Arc<InMemoryBlogStore>,
    pub history: Arc<InMemoryHistoryLog>,
    pub history_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            blogs: Arc::new(InMemoryBlogStore::new()),
            history: Arc::new(InMemoryHistoryLog::new()),
            history_timeout: Duration::from_millis(200),
        }
    }

    /// Set the history write timeout
    pub fn history_timeout(mut self, timeout: Duration) -> Self {
        self.history_timeout = timeout;
        self
    }

    /// Identity provider signing with the test secret
    pub fn identity_provider() -> IdentityProvider {
        IdentityProvider::new(
            JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string()),
            DEFAULT_ROLES_CLAIM,
        )
    }

    /// Convert into ServerDeps sharing these stores
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.blogs,
            self.history,
            self.history_timeout,
            Arc::new(Self::identity_provider()),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
