//! Server dependencies (using traits for testability)
//!
//! Central container handed to every action. Stores sit behind `Base*`
//! traits so tests can swap in the in-memory versions.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use super::history::HistoryRecorder;
use super::postgres::{PostgresBlogStore, PostgresHistoryLog};
use super::{BaseBlogStore, BaseHistoryLog};
use crate::domains::auth::IdentityProvider;

#[derive(Clone)]
pub struct ServerDeps {
    pub blogs: Arc<dyn BaseBlogStore>,
    pub history: Arc<HistoryRecorder>,
    /// Bearer token verification and claim normalization
    pub identity: Arc<IdentityProvider>,
}

impl ServerDeps {
    pub fn new(
        blogs: Arc<dyn BaseBlogStore>,
        history_log: Arc<dyn BaseHistoryLog>,
        history_timeout: Duration,
        identity: Arc<IdentityProvider>,
    ) -> Self {
        Self {
            blogs,
            history: Arc::new(HistoryRecorder::new(history_log, history_timeout)),
            identity,
        }
    }

    /// Production wiring: blogs and history on their own pools
    pub fn postgres(
        db_pool: PgPool,
        history_pool: PgPool,
        history_timeout: Duration,
        identity: IdentityProvider,
    ) -> Self {
        Self::new(
            Arc::new(PostgresBlogStore::new(db_pool)),
            Arc::new(PostgresHistoryLog::new(history_pool)),
            history_timeout,
            Arc::new(identity),
        )
    }
}
