//! Adapters wiring the client crates onto the core collaborator traits.

use std::sync::Arc;

use ai_client::OpenAi;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use riposte_core::{
    CompletionService, EmbeddingService, MediaItem, MediaRef, SentMessage, Transport,
};
use telegram_client::{InputMedia, TelegramBot};

/// Holds `None` when no API key is configured: missing credentials are a
/// per-call failure the pipeline degrades on, never a startup failure.
pub struct OpenAiEmbedder {
    client: Option<Arc<OpenAi>>,
}

impl OpenAiEmbedder {
    pub fn new(client: Option<Arc<OpenAi>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&OpenAi> {
        self.client
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not configured"))
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client()?.embed(text).await
    }
}

pub struct OpenAiCompleter {
    client: Option<Arc<OpenAi>>,
}

impl OpenAiCompleter {
    pub fn new(client: Option<Arc<OpenAi>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompletionService for OpenAiCompleter {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let client = self
            .client
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not configured"))?;
        client.chat_completion(system_prompt, user_text).await
    }
}

pub struct BotTransport {
    bot: Arc<TelegramBot>,
}

impl BotTransport {
    pub fn new(bot: Arc<TelegramBot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for BotTransport {
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage> {
        let sent = self.bot.send_message(chat_id, text, reply_to_message_id).await?;
        Ok(SentMessage {
            message_id: sent.message_id,
        })
    }

    async fn send_media_group(
        &self,
        chat_id: &str,
        items: Vec<MediaItem>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Vec<SentMessage>> {
        let media = items
            .into_iter()
            .map(|item| match item.media {
                MediaRef::Url(url) => InputMedia::Url {
                    url,
                    caption: item.caption,
                },
                MediaRef::Bytes { data, filename } => InputMedia::Upload {
                    data,
                    filename,
                    caption: item.caption,
                },
            })
            .collect();

        let sent = self
            .bot
            .send_media_group(chat_id, media, reply_to_message_id)
            .await?;

        Ok(sent
            .into_iter()
            .map(|m| SentMessage {
                message_id: m.message_id,
            })
            .collect())
    }

    async fn resolve_file_url(&self, file_id: &str) -> Result<String> {
        Ok(self.bot.resolve_file_url(file_id).await?)
    }

    async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        Ok(self.bot.download_file(file_id).await?)
    }
}
