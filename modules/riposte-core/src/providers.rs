//! Dyn-compatible seams over the generation provider.

use anyhow::Result;
use async_trait::async_trait;

/// Text → fixed-dimensionality vector.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// System prompt + user text → single-turn completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String>;
}
