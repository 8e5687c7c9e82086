pub mod config;
pub mod counters;
pub mod deps;
pub mod models;
pub mod providers;
pub mod queue;
pub mod store;
pub mod transport;
pub mod types;

pub use config::{AppConfig, ImageAcquisition};
pub use counters::FallbackCounters;
pub use deps::BotDeps;
pub use models::{Comment, Image, NewImage, Post, PostBundle, SimilarText, Text};
pub use providers::{CompletionService, EmbeddingService};
pub use queue::{CommentJob, JobQueue, MemoryQueue};
pub use store::{MemoryStore, ObjectStore};
pub use transport::{
    MediaItem, MediaRef, MemoryTransport, RecordedMediaGroup, RecordedText, SentMessage,
    Transport,
};
pub use types::{InboundMessage, InboundPhoto, EMBEDDING_DIM};
