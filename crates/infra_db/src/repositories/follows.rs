//! Follow repository
//!
//! The `(user_id, author_id)` pair is unique and may not name the same user
//! twice; inserts rely on `ON CONFLICT DO NOTHING` so concurrent follow
//! requests settle on a single row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `follows` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowRow {
    pub follow_id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created: DateTime<Utc>,
}

/// Repository for follow relationships
#[derive(Debug, Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the follow unless the pair exists
    ///
    /// # Returns
    ///
    /// `true` if a row was inserted
    pub async fn insert(&self, row: &FollowRow) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follow_id, user_id, author_id, created)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(row.follow_id)
        .bind(row.user_id)
        .bind(row.author_id)
        .bind(row.created)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Follower and following counts of a user
    pub async fn counts(&self, user_id: Uuid) -> Result<(i64, i64), DatabaseError> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM follows WHERE author_id = $1),
                (SELECT COUNT(*) FROM follows WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
