//! The shared reply sequence: retrieval → style → image selection →
//! generation → delivery → comment persistence. Both delivery modes run
//! this exact code; only how they obtain the post bundle differs.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use riposte_core::{BotDeps, Comment, Image, MediaItem, MediaRef, PostBundle, SimilarText};
use tracing::info;
use uuid::Uuid;

use crate::composer::ReplyComposer;
use crate::meme::{Captions, MemeCompositor};
use crate::retriever::{Retriever, DEFAULT_RETRIEVAL_LIMIT};
use crate::select::select_images;
use crate::style::Style;

/// Captions taken from match contents are cut to this many characters.
const CAPTION_MAX_CHARS: usize = 20;

/// Probability that a selected image is sent as-is instead of through the
/// compositor.
const RAW_IMAGE_PROBABILITY: f64 = 0.5;

pub struct ReplyPipeline {
    deps: BotDeps,
    retriever: Retriever,
    composer: ReplyComposer,
    compositor: MemeCompositor,
}

impl ReplyPipeline {
    pub fn new(deps: BotDeps) -> Result<Self> {
        let retriever = Retriever::new(
            deps.db_pool.clone(),
            deps.embedder.clone(),
            deps.counters.clone(),
        );
        let composer = ReplyComposer::new(deps.completer.clone(), deps.counters.clone());
        let compositor = MemeCompositor::new(deps.http_client.clone())?;

        Ok(Self {
            deps,
            retriever,
            composer,
            compositor,
        })
    }

    /// Generate and deliver the reply for an already-loaded post bundle,
    /// then persist the Comment. Delivery failures propagate; the rows
    /// ingested earlier are kept.
    pub async fn run(&self, bundle: &PostBundle) -> Result<Comment> {
        let post = &bundle.post;

        let matches = match bundle.primary_text() {
            Some(text) => {
                let embedding = self.retriever.embed(text).await;
                self.retriever
                    .find_similar(embedding, post.id, DEFAULT_RETRIEVAL_LIMIT)
                    .await
            }
            None => Vec::new(),
        };

        let mut rng = StdRng::from_os_rng();
        let style = Style::pick(&mut rng);

        let match_post_ids: Vec<Uuid> = matches.iter().map(|m| m.post_id).collect();
        let candidates = Image::find_for_posts(&match_post_ids, self.deps.pool()).await?;
        let selected = select_images(candidates, &mut rng);

        let reply_text = self
            .composer
            .generate(bundle.primary_text(), &matches, style)
            .await;

        let items = self
            .build_media(&selected, &matches, &reply_text, &mut rng)
            .await?;

        let sent_message_id = if items.is_empty() {
            self.deps
                .transport
                .send_text(&post.channel_id, &reply_text, Some(post.message_id))
                .await?
                .message_id
        } else {
            let sent = self
                .deps
                .transport
                .send_media_group(&post.channel_id, items, Some(post.message_id))
                .await?;
            sent.first()
                .map(|m| m.message_id)
                .ok_or_else(|| anyhow!("Transport returned an empty media group response"))?
        };

        let relevant_text_ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();
        let comment = Comment::create(
            post.id,
            &reply_text,
            style.as_str(),
            sent_message_id,
            &relevant_text_ids,
            self.deps.pool(),
        )
        .await?;

        info!(
            post_id = %post.id,
            message_id = sent_message_id,
            style = style.as_str(),
            "Reply sent"
        );

        Ok(comment)
    }

    /// Turn the selected images into media items. Each image passes the
    /// compositor with probability 1 - RAW_IMAGE_PROBABILITY, captioned
    /// with the ellipsized contents of matches i and i+1. The reply text
    /// rides on the first item.
    async fn build_media(
        &self,
        selected: &[Image],
        matches: &[SimilarText],
        reply_text: &str,
        rng: &mut StdRng,
    ) -> Result<Vec<MediaItem>> {
        let mut items = Vec::with_capacity(selected.len());

        for (i, image) in selected.iter().enumerate() {
            let media = if rng.random_bool(RAW_IMAGE_PROBABILITY) {
                MediaRef::Url(image.url.clone())
            } else {
                let captions = Captions {
                    top: matches.get(i).map(|m| ellipsis(&m.content, CAPTION_MAX_CHARS)),
                    bottom: matches
                        .get(i + 1)
                        .map(|m| ellipsis(&m.content, CAPTION_MAX_CHARS)),
                };
                let meme = self.compositor.mutate(&image.url, captions, rng).await?;
                MediaRef::Bytes {
                    data: meme.data,
                    filename: meme.filename,
                }
            };

            items.push(MediaItem {
                media,
                caption: (i == 0).then(|| reply_text.to_string()),
            });
        }

        Ok(items)
    }
}

/// Cut `text` to at most `max_chars` characters, appending an ellipsis
/// when something was cut.
fn ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
