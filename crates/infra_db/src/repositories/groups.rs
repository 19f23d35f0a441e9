//! Group repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `groups` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub group_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Repository for post groups
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, group_id: Uuid) -> Result<GroupRow, DatabaseError> {
        sqlx::query_as::<_, GroupRow>(
            "SELECT group_id, title, slug, description FROM groups WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Group", group_id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRow>, DatabaseError> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT group_id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<GroupRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            "SELECT group_id, title, slug, description FROM groups ORDER BY title, slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert(&self, row: &GroupRow) -> Result<GroupRow, DatabaseError> {
        let inserted = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (group_id, title, slug, description)
            VALUES ($1, $2, $3, $4)
            RETURNING group_id, title, slug, description
            "#,
        )
        .bind(row.group_id)
        .bind(&row.title)
        .bind(&row.slug)
        .bind(&row.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }
}
