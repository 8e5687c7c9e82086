mod providers;
mod queue;
mod store;
mod update;

use std::sync::Arc;

use ai_client::OpenAi;
use anyhow::Result;
use riposte_core::{AppConfig, BotDeps, FallbackCounters, EMBEDDING_DIM};
use riposte_reply::{CommentWorker, Ingestor, ReplyPipeline};
use sqlx::PgPool;
use telegram_client::TelegramBot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use providers::{BotTransport, OpenAiCompleter, OpenAiEmbedder};
use queue::LocalQueue;
use store::FsStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("riposte=info".parse()?))
        .init();

    info!("Riposte starting...");

    let config = AppConfig::from_env()?;

    let pool = PgPool::connect(&config.database_url).await?;
    riposte_core::models::migrate(&pool).await?;

    let bot = Arc::new(TelegramBot::new(config.telegram_bot_token.as_str()));

    let ai = config.openai_api_key.as_deref().map(|key| {
        Arc::new(
            OpenAi::new(key, config.openai_model.as_str())
                .with_embedding_model(config.embedding_model.as_str())
                .with_embedding_dimensions(EMBEDDING_DIM as u32),
        )
    });

    let (local_queue, queue_runner) = LocalQueue::new();
    let counters = Arc::new(FallbackCounters::new());

    let deps = BotDeps {
        db_pool: pool,
        http_client: reqwest::Client::new(),
        transport: Arc::new(BotTransport::new(bot.clone())),
        embedder: Arc::new(OpenAiEmbedder::new(ai.clone())),
        completer: Arc::new(OpenAiCompleter::new(ai)),
        store: Arc::new(FsStore::new(
            config.storage_dir.as_str(),
            config.storage_public_url.as_str(),
        )),
        queue: Arc::new(local_queue),
        counters: counters.clone(),
        config,
    };

    let pipeline = Arc::new(ReplyPipeline::new(deps.clone())?);
    let ingestor = Arc::new(Ingestor::new(deps.clone(), pipeline.clone()));
    let worker = Arc::new(CommentWorker::new(deps, pipeline));

    tokio::spawn(queue_runner.run(worker));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            counters.log_status();
        }
    });

    info!("Riposte ready, polling for updates");
    update::run_update_loop(bot, ingestor).await
}
