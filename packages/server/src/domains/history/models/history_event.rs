use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::domains::blogs::models::Blog;

/// Partition every blog snapshot is written under
pub const HISTORY_APPLICATION: &str = "history";

/// Latest-known status snapshot of one blog, keyed by
/// `(application, history_id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub application: String,
    pub history_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Who caused the snapshot
    pub user_email: String,
    pub status: String,
}

impl HistoryEvent {
    /// Snapshot a blog row as written by `user_email`
    pub fn for_blog(blog: &Blog, user_email: &str) -> Self {
        Self {
            application: HISTORY_APPLICATION.to_string(),
            history_id: blog.id.to_string(),
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            user_email: user_email.to_string(),
            status: blog.status.to_string(),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl HistoryEvent {
    /// Insert or fully replace the record for this key
    pub async fn upsert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO history_events (
                application,
                history_id,
                created_at,
                updated_at,
                user_email,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (application, history_id) DO UPDATE SET
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at,
                user_email = EXCLUDED.user_email,
                status = EXCLUDED.status
            "#,
        )
        .bind(&self.application)
        .bind(&self.history_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .bind(&self.user_email)
        .bind(&self.status)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Change status fields only, keeping `created_at`; creates the record
    /// when it does not exist yet.
    pub async fn upsert_status(&self, pool: &PgPool) -> Result<Self> {
        let event = sqlx::query_as::<_, HistoryEvent>(
            r#"
            INSERT INTO history_events (
                application,
                history_id,
                created_at,
                updated_at,
                user_email,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (application, history_id) DO UPDATE SET
                updated_at = EXCLUDED.updated_at,
                user_email = EXCLUDED.user_email,
                status = EXCLUDED.status
            RETURNING *
            "#,
        )
        .bind(&self.application)
        .bind(&self.history_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .bind(&self.user_email)
        .bind(&self.status)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    pub async fn find(application: &str, history_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let event = sqlx::query_as::<_, HistoryEvent>(
            "SELECT * FROM history_events WHERE application = $1 AND history_id = $2",
        )
        .bind(application)
        .bind(history_id)
        .fetch_optional(pool)
        .await?;
        Ok(event)
    }

    /// Every record in a partition, by sort key
    pub async fn find_by_application(application: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let events = sqlx::query_as::<_, HistoryEvent>(
            "SELECT * FROM history_events WHERE application = $1 ORDER BY history_id",
        )
        .bind(application)
        .fetch_all(pool)
        .await?;
        Ok(events)
    }
}
