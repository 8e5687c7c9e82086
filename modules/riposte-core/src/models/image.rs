use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An accepted image attachment. Exactly one row per attachment; only the
/// highest-resolution variant of a multi-resolution set is kept.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    pub post_id: Uuid,
    pub file_id: String,
    pub storage_key: String,
    pub url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Column values for a new image row.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub post_id: Uuid,
    pub file_id: String,
    pub storage_key: String,
    pub url: String,
    pub mime_type: String,
    pub file_size: i64,
}

impl Image {
    pub async fn create(new: NewImage, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO images (post_id, file_id, storage_key, url, mime_type, file_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.post_id)
        .bind(&new.file_id)
        .bind(&new.storage_key)
        .bind(&new.url)
        .bind(&new.mime_type)
        .bind(new.file_size)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_post(post_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM images WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// All images belonging to any of the given posts.
    pub async fn find_for_posts(post_ids: &[Uuid], pool: &PgPool) -> Result<Vec<Self>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Self>(
            "SELECT * FROM images WHERE post_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(post_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
