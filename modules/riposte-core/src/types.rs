/// Width of every stored embedding vector.
pub const EMBEDDING_DIM: usize = 256;

/// A transport-agnostic inbound message, normalized before ingestion.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    pub channel_id: String,
    pub message_id: i64,
    pub author_username: Option<String>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photos: Vec<InboundPhoto>,
}

impl InboundMessage {
    /// The message's textual content: body text, falling back to the
    /// media caption.
    pub fn content_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

/// One resolution variant of an inbound photo attachment. Several
/// variants of the same attachment share an `attachment_id`.
#[derive(Debug, Clone)]
pub struct InboundPhoto {
    pub attachment_id: String,
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<i64>,
}
