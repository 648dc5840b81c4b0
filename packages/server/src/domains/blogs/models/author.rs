use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{Role, UserId};

/// Stored author (the `users` table).
///
/// `role` here is reporting data; request authorization follows the
/// caller's token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author row plus moderation counts for the admin user list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub author: Author,
    pub approved_blogs: i64,
    pub rejected_blogs: i64,
    pub pending_blogs: i64,
    pub last_active: DateTime<Utc>,
}

impl AuthorWithStats {
    pub fn total_blogs(&self) -> i64 {
        self.approved_blogs + self.rejected_blogs + self.pending_blogs
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Author {
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(author)
    }

    /// Insert an author, or move the subject's existing row to `email`.
    ///
    /// Covers a subject whose provider email changed, and two first
    /// submissions by the same subject racing each other. An email already
    /// held by a different subject is a unique violation.
    pub async fn create(id: &UserId, email: &str, name: &str, pool: &PgPool) -> Result<Self> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, 'USER')
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(author)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Set the stored role; `None` if the user does not exist
    pub async fn update_role(id: &UserId, role: Role, pool: &PgPool) -> Result<Option<Self>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(author)
    }
}

impl AuthorWithStats {
    /// Every author with per-status counts, newest account first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let authors = sqlx::query_as::<_, AuthorWithStats>(
            r#"
            SELECT
                u.*,
                COUNT(b.id) FILTER (WHERE b.status = 'APPROVED') AS approved_blogs,
                COUNT(b.id) FILTER (WHERE b.status = 'REJECTED') AS rejected_blogs,
                COUNT(b.id) FILTER (WHERE b.status = 'PENDING') AS pending_blogs,
                COALESCE(MAX(b.created_at), u.created_at) AS last_active
            FROM users u
            LEFT JOIN blogs b ON b.author_id = u.id
            GROUP BY u.id
            ORDER BY u.created_at DESC, u.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(authors)
    }
}
