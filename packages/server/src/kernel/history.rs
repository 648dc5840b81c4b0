//! Best-effort history writes.
//!
//! The recorder never returns an error: a failed or slow write is logged,
//! counted, and dropped. The primary mutation has already been committed by
//! the time it runs.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::BaseHistoryLog;
use crate::domains::blogs::models::Blog;
use crate::domains::history::HistoryEvent;

pub const DEFAULT_HISTORY_TIMEOUT: Duration = Duration::from_millis(2000);

pub struct HistoryRecorder {
    log: Arc<dyn BaseHistoryLog>,
    timeout: Duration,
    failures: AtomicU64,
}

impl HistoryRecorder {
    pub fn new(log: Arc<dyn BaseHistoryLog>, timeout: Duration) -> Self {
        Self {
            log,
            timeout,
            failures: AtomicU64::new(0),
        }
    }

    /// Underlying sink, for reads
    pub fn log(&self) -> &Arc<dyn BaseHistoryLog> {
        &self.log
    }

    /// Number of history writes that failed or timed out since startup
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Snapshot a freshly created blog
    pub async fn record_created(&self, blog: &Blog, user_email: &str) {
        let event = HistoryEvent::for_blog(blog, user_email);
        self.run(&event.history_id, self.log.put(&event)).await;
    }

    /// Record an applied status change
    pub async fn record_status_change(&self, blog: &Blog, user_email: &str) {
        let event = HistoryEvent::for_blog(blog, user_email);
        self.run(&event.history_id, async {
            self.log
                .update_status(
                    &event.application,
                    &event.history_id,
                    &event.status,
                    &event.user_email,
                    event.created_at,
                    event.updated_at,
                )
                .await
                .map(|_| ())
        })
        .await;
    }

    async fn run<F>(&self, history_id: &str, write: F)
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        match tokio::time::timeout(self.timeout, write).await {
            Ok(Ok(())) => {
                debug!(history_id = %history_id, "History recorded");
            }
            Ok(Err(e)) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(history_id = %history_id, error = %e, "History write failed");
            }
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    history_id = %history_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "History write timed out"
                );
            }
        }
    }
}
