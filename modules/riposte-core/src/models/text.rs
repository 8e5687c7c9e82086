use anyhow::Result;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use sqlx::PgPool;
use uuid::Uuid;

/// Text content attached to a post, with its embedding. Created once at
/// ingestion, never mutated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Text {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub embedding: Option<Vector>,
    pub created_at: DateTime<Utc>,
}

/// Row returned by the nearest-neighbor query: a prior text plus the
/// denormalized post fields reply construction needs. Lower distance =
/// more similar.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SimilarText {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub distance: f64,
    pub channel_id: String,
    pub message_id: i64,
    pub author_username: Option<String>,
}

impl Text {
    pub async fn create(
        post_id: Uuid,
        content: &str,
        embedding: Option<Vector>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO texts (post_id, content, embedding)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(content)
        .bind(embedding)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_post(post_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM texts WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Nearest prior texts by L2 distance, ascending. The source post is
    /// excluded: its own text is already persisted when retrieval runs
    /// and would otherwise always match itself.
    pub async fn find_similar(
        query_embedding: Vector,
        exclude_post_id: Uuid,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<SimilarText>> {
        sqlx::query_as::<_, SimilarText>(
            r#"
            SELECT
                t.id,
                t.post_id,
                t.content,
                (t.embedding <-> $1) AS distance,
                p.channel_id,
                p.message_id,
                p.author_username
            FROM texts t
            JOIN posts p ON p.id = t.post_id
            WHERE t.embedding IS NOT NULL
              AND t.post_id <> $2
            ORDER BY t.embedding <-> $1
            LIMIT $3
            "#,
        )
        .bind(&query_embedding)
        .bind(exclude_post_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
