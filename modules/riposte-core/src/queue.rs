//! Job queue seam. The queue itself is an external collaborator with
//! at-least-once delivery; this crate only defines the enqueue side and
//! the job payload.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a deferred comment-generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentJob {
    pub post_id: Uuid,
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job that becomes eligible after `delay`.
    async fn enqueue(&self, job: CommentJob, delay: Duration) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryQueue (tests — records enqueues, runs nothing)
// ---------------------------------------------------------------------------

/// In-memory queue for testing. Thread-safe.
#[derive(Default)]
pub struct MemoryQueue {
    jobs: Mutex<Vec<(CommentJob, Duration)>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> Vec<(CommentJob, Duration)> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, job: CommentJob, delay: Duration) -> Result<()> {
        self.jobs.lock().unwrap().push((job, delay));
        Ok(())
    }
}
