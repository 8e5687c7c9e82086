use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// The bot's own generated reply to a post. Created exactly once per
/// successful reply attempt; never mutated or deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub style: String,
    pub message_id: i64,
    pub relevant_text_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub async fn create(
        post_id: Uuid,
        content: &str,
        style: &str,
        message_id: i64,
        relevant_text_ids: &[Uuid],
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO comments (post_id, content, style, message_id, relevant_text_ids)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(content)
        .bind(style)
        .bind(message_id)
        .bind(relevant_text_ids)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_post(post_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
