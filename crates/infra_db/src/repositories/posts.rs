//! Post repository
//!
//! Feed queries share one filtered statement: every filter is an optional
//! bind parameter, so the same SQL serves the index, group, profile and
//! follow feeds. Rows come back newest first with the post id as tiebreaker.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `posts` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub post_id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

/// A post joined with its author and group
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostEntryRow {
    pub post_id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub image: Option<String>,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub group_id: Option<Uuid>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub group_description: Option<String>,
}

/// Which posts a feed query selects; unset fields do not filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub group_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    /// Only posts by authors this user follows
    pub followed_by: Option<Uuid>,
}

const POST_COLUMNS: &str = "post_id, text, pub_date, author_id, group_id, image";

const ENTRY_SELECT: &str = r#"
    SELECT
        p.post_id,
        p.text,
        p.pub_date,
        p.author_id,
        p.image,
        u.username AS author_username,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        g.group_id,
        g.title AS group_title,
        g.slug AS group_slug,
        g.description AS group_description
    FROM posts p
    JOIN users u ON u.user_id = p.author_id
    LEFT JOIN groups g ON g.group_id = p.group_id
"#;

const FEED_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR p.group_id = $1)
      AND ($2::uuid IS NULL OR p.author_id = $2)
      AND ($3::uuid IS NULL OR p.author_id IN (
            SELECT f.author_id FROM follows f WHERE f.user_id = $3))
"#;

/// Repository for posts and feeds
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a post with its author and group
    pub async fn get_entry(&self, post_id: Uuid) -> Result<PostEntryRow, DatabaseError> {
        sqlx::query_as::<_, PostEntryRow>(&format!("{} WHERE p.post_id = $1", ENTRY_SELECT))
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Post", post_id))
    }

    /// Counts the posts selected by `filter`
    pub async fn count(&self, filter: PostFilter) -> Result<u64, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts p {}", FEED_FILTER))
                .bind(filter.group_id)
                .bind(filter.author_id)
                .bind(filter.followed_by)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }

    /// Fetches one window of the feed selected by `filter`
    ///
    /// # Arguments
    ///
    /// * `filter` - Which posts qualify
    /// * `limit` - Maximum rows to return
    /// * `offset` - Rows to skip
    pub async fn list_entries(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PostEntryRow>(&format!(
            "{} {} ORDER BY p.pub_date DESC, p.post_id DESC LIMIT $4 OFFSET $5",
            ENTRY_SELECT, FEED_FILTER
        ))
        .bind(filter.group_id)
        .bind(filter.author_id)
        .bind(filter.followed_by)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Inserts a post
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` for an unknown author or group
    pub async fn insert(&self, row: &PostRow) -> Result<PostRow, DatabaseError> {
        let inserted = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (post_id, text, pub_date, author_id, group_id, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(row.post_id)
        .bind(&row.text)
        .bind(row.pub_date)
        .bind(row.author_id)
        .bind(row.group_id)
        .bind(&row.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    /// Rewrites the editable columns of a post
    ///
    /// A `None` image keeps the stored one.
    pub async fn update(
        &self,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<PostRow, DatabaseError> {
        sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3, image = COALESCE($4, image)
            WHERE post_id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post_id)
        .bind(text)
        .bind(group_id)
        .bind(image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Post", post_id))
    }

    /// Deletes a post; comments go with it through the foreign key
    pub async fn delete(&self, post_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
