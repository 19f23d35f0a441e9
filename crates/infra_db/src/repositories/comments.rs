//! Comment repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `comments` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A comment joined with its author's names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentEntryRow {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
}

/// Repository for post comments
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, row: &CommentRow) -> Result<CommentRow, DatabaseError> {
        let inserted = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (comment_id, post_id, author_id, text, created)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING comment_id, post_id, author_id, text, created
            "#,
        )
        .bind(row.comment_id)
        .bind(row.post_id)
        .bind(row.author_id)
        .bind(&row.text)
        .bind(row.created)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    /// Comments of a post, oldest first
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CommentEntryRow>(
            r#"
            SELECT
                c.comment_id,
                c.post_id,
                c.author_id,
                c.text,
                c.created,
                u.username AS author_username,
                u.first_name AS author_first_name,
                u.last_name AS author_last_name
            FROM comments c
            JOIN users u ON u.user_id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created ASC, c.comment_id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
