//! Deferred comment generation: the queue's consumption hook.

use std::sync::Arc;

use anyhow::Result;
use riposte_core::{BotDeps, CommentJob, Post};
use tracing::{info, warn};

use crate::pipeline::ReplyPipeline;

pub struct CommentWorker {
    deps: BotDeps,
    pipeline: Arc<ReplyPipeline>,
}

impl CommentWorker {
    pub fn new(deps: BotDeps, pipeline: Arc<ReplyPipeline>) -> Self {
        Self { deps, pipeline }
    }

    /// Process one queued job. A vanished post or a post without texts
    /// completes without a comment and without retry; pipeline errors
    /// propagate to the queue's own retry policy.
    pub async fn handle(&self, job: CommentJob) -> Result<()> {
        info!(post_id = %job.post_id, "Generating comment for post");

        let Some(bundle) = Post::find_bundle(job.post_id, self.deps.pool()).await? else {
            warn!(post_id = %job.post_id, "No post found for comment job");
            return Ok(());
        };

        if bundle.texts.is_empty() {
            warn!(post_id = %job.post_id, "No texts found for post");
            return Ok(());
        }

        self.pipeline.run(&bundle).await?;

        info!(post_id = %job.post_id, "Comment generated and posted");
        Ok(())
    }
}
