use std::sync::Arc;

use pgvector::Vector;
use riposte_core::{EmbeddingService, FallbackCounters, SimilarText, Text, EMBEDDING_DIM};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Default nearest-neighbor limit.
pub const DEFAULT_RETRIEVAL_LIMIT: i64 = 10;

/// Wraps the embedding provider and the nearest-neighbor query into one
/// best-effort "find related prior content" operation. Neither call ever
/// blocks reply delivery: failures degrade instead of propagating.
#[derive(Clone)]
pub struct Retriever {
    pool: PgPool,
    embedder: Arc<dyn EmbeddingService>,
    counters: Arc<FallbackCounters>,
}

impl Retriever {
    pub fn new(
        pool: PgPool,
        embedder: Arc<dyn EmbeddingService>,
        counters: Arc<FallbackCounters>,
    ) -> Self {
        Self {
            pool,
            embedder,
            counters,
        }
    }

    /// Embed `text`. On provider failure (including missing credentials)
    /// returns the zero vector of the declared dimensionality, so
    /// retrieval degrades to "no strong matches" instead of aborting.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        match self.embedder.embed(text).await {
            Ok(vector) if vector.len() == EMBEDDING_DIM => vector,
            Ok(vector) => {
                warn!(
                    got = vector.len(),
                    expected = EMBEDDING_DIM,
                    "Embedding has wrong dimensionality"
                );
                self.counters.record_embed_failure();
                vec![0.0; EMBEDDING_DIM]
            }
            Err(e) => {
                warn!(error = %e, "Failed to create embedding");
                self.counters.record_embed_failure();
                vec![0.0; EMBEDDING_DIM]
            }
        }
    }

    /// Nearest prior texts, ascending by distance, at most `limit` rows,
    /// excluding the post the query text came from. Query failures
    /// return an empty list.
    pub async fn find_similar(
        &self,
        embedding: Vec<f32>,
        exclude_post_id: Uuid,
        limit: i64,
    ) -> Vec<SimilarText> {
        match Text::find_similar(Vector::from(embedding), exclude_post_id, limit, &self.pool).await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Failed to find similar texts");
                self.counters.record_retrieval_failure();
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use super::*;

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingService for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            bail!("provider not configured")
        }
    }

    struct WrongDimEmbedder;

    #[async_trait]
    impl EmbeddingService for WrongDimEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; 8])
        }
    }

    fn lazy_pool() -> PgPool {
        // Never actually connected in these tests.
        PgPool::connect_lazy("postgres://localhost/unused").unwrap()
    }

    #[tokio::test]
    async fn provider_failure_yields_zero_vector_of_declared_dim() {
        let counters = Arc::new(FallbackCounters::new());
        let retriever = Retriever::new(lazy_pool(), Arc::new(FailingEmbedder), counters.clone());

        let vector = retriever.embed("привет").await;

        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert!(vector.iter().all(|v| *v == 0.0));
        assert_eq!(counters.embed_failures(), 1);
    }

    #[tokio::test]
    async fn wrong_dimensionality_is_normalized_to_fallback() {
        let counters = Arc::new(FallbackCounters::new());
        let retriever = Retriever::new(lazy_pool(), Arc::new(WrongDimEmbedder), counters.clone());

        let vector = retriever.embed("привет").await;

        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert_eq!(counters.embed_failures(), 1);
    }

    #[tokio::test]
    async fn query_failure_degrades_to_empty_matches() {
        // The lazy pool points at nothing; the query errs and degrades.
        let counters = Arc::new(FallbackCounters::new());
        let retriever = Retriever::new(lazy_pool(), Arc::new(FailingEmbedder), counters.clone());

        let matches = retriever
            .find_similar(
                vec![0.0; EMBEDDING_DIM],
                Uuid::new_v4(),
                DEFAULT_RETRIEVAL_LIMIT,
            )
            .await;

        assert!(matches.is_empty());
        assert_eq!(counters.retrieval_failures(), 1);
    }
}
