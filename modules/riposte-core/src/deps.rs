use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::counters::FallbackCounters;
use crate::providers::{CompletionService, EmbeddingService};
use crate::queue::JobQueue;
use crate::store::ObjectStore;
use crate::transport::Transport;

/// Central dependency container passed to the pipeline components.
#[derive(Clone)]
pub struct BotDeps {
    pub db_pool: PgPool,
    pub http_client: reqwest::Client,
    pub transport: Arc<dyn Transport>,
    pub embedder: Arc<dyn EmbeddingService>,
    pub completer: Arc<dyn CompletionService>,
    pub store: Arc<dyn ObjectStore>,
    pub queue: Arc<dyn JobQueue>,
    pub counters: Arc<FallbackCounters>,
    pub config: AppConfig,
}

impl BotDeps {
    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}
