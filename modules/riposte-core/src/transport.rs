//! Messaging transport seam.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Where a media item's pixels come from at send time.
#[derive(Debug, Clone)]
pub enum MediaRef {
    /// A URL the transport can fetch itself.
    Url(String),
    /// In-memory bytes to upload with the request.
    Bytes { data: Bytes, filename: String },
}

/// One photo entry of an outgoing media group.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub media: MediaRef,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SentMessage {
    pub message_id: i64,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage>;

    async fn send_media_group(
        &self,
        chat_id: &str,
        items: Vec<MediaItem>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Vec<SentMessage>>;

    /// Resolve a transport file id to a publicly fetchable URL.
    async fn resolve_file_url(&self, file_id: &str) -> Result<String>;

    async fn download_file(&self, file_id: &str) -> Result<Bytes>;
}

// ---------------------------------------------------------------------------
// MemoryTransport (tests — no network required)
// ---------------------------------------------------------------------------

/// A text message recorded by [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct RecordedText {
    pub chat_id: String,
    pub text: String,
    pub reply_to_message_id: Option<i64>,
    pub message_id: i64,
}

/// A media group recorded by [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct RecordedMediaGroup {
    pub chat_id: String,
    pub items: Vec<MediaItem>,
    pub reply_to_message_id: Option<i64>,
    pub first_message_id: i64,
}

/// In-memory transport for testing. Assigns incrementing message ids and
/// records everything sent for assertions. Thread-safe.
#[derive(Default)]
pub struct MemoryTransport {
    next_message_id: AtomicI64,
    texts: Mutex<Vec<RecordedText>>,
    media_groups: Mutex<Vec<RecordedMediaGroup>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(100),
            texts: Mutex::new(Vec::new()),
            media_groups: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_texts(&self) -> Vec<RecordedText> {
        self.texts.lock().unwrap().clone()
    }

    pub fn sent_media_groups(&self) -> Vec<RecordedMediaGroup> {
        self.media_groups.lock().unwrap().clone()
    }

    fn next_id(&self) -> i64 {
        self.next_message_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage> {
        let message_id = self.next_id();
        self.texts.lock().unwrap().push(RecordedText {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            reply_to_message_id,
            message_id,
        });
        Ok(SentMessage { message_id })
    }

    async fn send_media_group(
        &self,
        chat_id: &str,
        items: Vec<MediaItem>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Vec<SentMessage>> {
        let first_message_id = self.next_id();
        let sent = (0..items.len())
            .map(|i| SentMessage {
                message_id: first_message_id + i as i64,
            })
            .collect();
        self.media_groups.lock().unwrap().push(RecordedMediaGroup {
            chat_id: chat_id.to_string(),
            items,
            reply_to_message_id,
            first_message_id,
        });
        Ok(sent)
    }

    async fn resolve_file_url(&self, file_id: &str) -> Result<String> {
        Ok(format!("memory://files/{file_id}"))
    }

    async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        Ok(Bytes::from(format!("bytes-of-{file_id}")))
    }
}
