//! In-process delayed job queue. A stand-in for an external queue with
//! the same at-least-once-ish contract: one fixed-backoff retry, then
//! the job is dropped with an error log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use riposte_core::{CommentJob, JobQueue};
use tokio::sync::mpsc;
use tracing::{error, warn};

use riposte_reply::CommentWorker;

const RETRY_BACKOFF: Duration = Duration::from_secs(10);

pub struct LocalQueue {
    tx: mpsc::UnboundedSender<(CommentJob, Duration)>,
}

impl LocalQueue {
    /// Create the queue and the consumer half that drains it.
    pub fn new() -> (Self, LocalQueueRunner) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, LocalQueueRunner { rx })
    }
}

#[async_trait]
impl JobQueue for LocalQueue {
    async fn enqueue(&self, job: CommentJob, delay: Duration) -> Result<()> {
        self.tx
            .send((job, delay))
            .map_err(|_| anyhow!("Job queue consumer is gone"))
    }
}

pub struct LocalQueueRunner {
    rx: mpsc::UnboundedReceiver<(CommentJob, Duration)>,
}

impl LocalQueueRunner {
    /// Consume jobs until the queue side is dropped. Each job waits out
    /// its delay on its own task, so jobs do not serialize behind each
    /// other.
    pub async fn run(mut self, worker: Arc<CommentWorker>) {
        while let Some((job, delay)) = self.rx.recv().await {
            let worker = worker.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;

                if let Err(e) = worker.handle(job).await {
                    warn!(post_id = %job.post_id, error = %e, "Comment job failed, retrying once");
                    tokio::time::sleep(RETRY_BACKOFF).await;

                    if let Err(e) = worker.handle(job).await {
                        error!(post_id = %job.post_id, error = %e, "Comment job failed after retry");
                    }
                }
            });
        }
    }
}
