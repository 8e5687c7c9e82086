use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Image, Text};

/// One inbound message and its pipeline-derived children. Immutable once
/// created except through attached Text/Image/Comment rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub channel_id: String,
    pub message_id: i64,
    pub author_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post with its Text and Image rows, loaded once per pipeline run.
#[derive(Debug, Clone)]
pub struct PostBundle {
    pub post: Post,
    pub texts: Vec<Text>,
    pub images: Vec<Image>,
}

impl PostBundle {
    /// Content of the first text row, if any.
    pub fn primary_text(&self) -> Option<&str> {
        self.texts.first().map(|t| t.content.as_str())
    }
}

impl Post {
    pub async fn create(
        channel_id: &str,
        message_id: i64,
        author_username: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO posts (channel_id, message_id, author_username)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(channel_id)
        .bind(message_id)
        .bind(author_username)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Load a post together with its texts and images. The bundle is the
    /// state the reply pipeline works from; it is not re-read mid-run.
    pub async fn find_bundle(id: Uuid, pool: &PgPool) -> Result<Option<PostBundle>> {
        let Some(post) = Self::find_by_id(id, pool).await? else {
            return Ok(None);
        };

        let texts = Text::find_for_post(id, pool).await?;
        let images = Image::find_for_post(id, pool).await?;

        Ok(Some(PostBundle {
            post,
            texts,
            images,
        }))
    }
}
