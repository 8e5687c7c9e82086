//! Post ingestion: persist the inbound message and its attachments, then
//! either reply inline or hand the reply phase to the job queue.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pgvector::Vector;
use riposte_core::{
    BotDeps, CommentJob, Image, ImageAcquisition, InboundMessage, InboundPhoto, NewImage, Post,
    Text,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::pipeline::ReplyPipeline;
use crate::retriever::Retriever;

/// Best-effort reply when the whole flow fails.
pub const APOLOGY_TEXT: &str = "🤔 Что-то пошло не так, но я все равно отвечу!";

pub struct Ingestor {
    deps: BotDeps,
    retriever: Retriever,
    pipeline: Arc<ReplyPipeline>,
}

impl Ingestor {
    pub fn new(deps: BotDeps, pipeline: Arc<ReplyPipeline>) -> Self {
        let retriever = Retriever::new(
            deps.db_pool.clone(),
            deps.embedder.clone(),
            deps.counters.clone(),
        );
        Self {
            deps,
            retriever,
            pipeline,
        }
    }

    /// Immediate mode: ingest and reply within the inbound request. Any
    /// failure is contained here: one apology reply is attempted, its own
    /// failure swallowed, so the next message is never blocked.
    pub async fn handle_message(&self, message: &InboundMessage) {
        if let Err(e) = self.ingest_and_reply(message).await {
            error!(
                message_id = message.message_id,
                error = %e,
                "Error processing message"
            );

            self.deps.counters.record_apology();
            if let Err(e) = self
                .deps
                .transport
                .send_text(&message.channel_id, APOLOGY_TEXT, Some(message.message_id))
                .await
            {
                error!(error = %e, "Failed to send error reply");
            }
        }
    }

    /// Deferred mode: ingest now, enqueue the reply phase with the
    /// configured delay. Errors propagate to the caller.
    pub async fn handle_channel_message(&self, message: &InboundMessage) -> Result<()> {
        let post = self.ingest(message).await?;

        self.deps
            .queue
            .enqueue(
                CommentJob { post_id: post.id },
                Duration::from_millis(self.deps.config.comment_delay_ms),
            )
            .await?;

        info!(
            message_id = message.message_id,
            post_id = %post.id,
            "Message processed, comment job enqueued"
        );
        Ok(())
    }

    async fn ingest_and_reply(&self, message: &InboundMessage) -> Result<()> {
        info!(
            message_id = message.message_id,
            "Processing message for immediate reply"
        );

        let post = self.ingest(message).await?;

        let Some(bundle) = Post::find_bundle(post.id, self.deps.pool()).await? else {
            error!(post_id = %post.id, "Could not reload post after creation");
            return Ok(());
        };

        self.pipeline.run(&bundle).await?;
        Ok(())
    }

    /// Persist the Post plus its Text and Image children.
    async fn ingest(&self, message: &InboundMessage) -> Result<Post> {
        let post = Post::create(
            &message.channel_id,
            message.message_id,
            message.author_username.as_deref(),
            self.deps.pool(),
        )
        .await?;

        if let Some(text) = message.content_text() {
            self.process_text(post.id, text).await?;
        }

        if !message.photos.is_empty() {
            self.process_images(post.id, &message.photos).await?;
        }

        Ok(post)
    }

    /// Embed and store the text. A failed embedding stores the degraded
    /// zero vector rather than blocking ingestion.
    async fn process_text(&self, post_id: Uuid, text: &str) -> Result<()> {
        let embedding = self.retriever.embed(text).await;
        Text::create(post_id, text, Some(Vector::from(embedding)), self.deps.pool()).await?;

        info!(post_id = %post_id, "Text processed");
        Ok(())
    }

    /// Persist exactly one Image row per accepted attachment.
    async fn process_images(&self, post_id: Uuid, photos: &[InboundPhoto]) -> Result<()> {
        for photo in best_variants(photos) {
            let (storage_key, url) = match self.deps.config.image_acquisition {
                ImageAcquisition::TransportRef => {
                    let url = self.deps.transport.resolve_file_url(&photo.file_id).await?;
                    (Uuid::new_v4().to_string(), url)
                }
                ImageAcquisition::StoreUpload => {
                    let data = self.deps.transport.download_file(&photo.file_id).await?;
                    let key = self.deps.store.put(data, &photo.file_id).await?;
                    let url = self.deps.store.public_url(&key);
                    (key, url)
                }
            };

            Image::create(
                NewImage {
                    post_id,
                    file_id: photo.file_id.clone(),
                    storage_key,
                    url,
                    mime_type: "image/jpeg".to_string(),
                    file_size: photo.file_size.unwrap_or(0),
                },
                self.deps.pool(),
            )
            .await?;
        }

        info!(post_id = %post_id, "Images processed");
        Ok(())
    }
}

/// Deduplicate photo variants by attachment id (keeping first-occurrence
/// order) and pick the highest-resolution variant of each attachment.
fn best_variants(photos: &[InboundPhoto]) -> Vec<InboundPhoto> {
    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, &InboundPhoto> = HashMap::new();

    for photo in photos {
        let replace = match best.get(photo.attachment_id.as_str()) {
            None => {
                order.push(photo.attachment_id.as_str());
                true
            }
            Some(current) => pixels(photo) > pixels(current),
        };
        if replace {
            best.insert(photo.attachment_id.as_str(), photo);
        }
    }

    order.into_iter().map(|id| best[id].clone()).collect()
}

fn pixels(photo: &InboundPhoto) -> u64 {
    photo.width as u64 * photo.height as u64
}
