pub mod composer;
pub mod ingest;
pub mod layout;
pub mod meme;
pub mod pipeline;
pub mod retriever;
pub mod select;
pub mod style;
pub mod worker;

pub use composer::{ReplyComposer, GENERATION_FAILURE_TEXT};
pub use ingest::{Ingestor, APOLOGY_TEXT};
pub use meme::{Captions, MemeCompositor, RenderedMeme};
pub use pipeline::ReplyPipeline;
pub use retriever::{Retriever, DEFAULT_RETRIEVAL_LIMIT};
pub use select::{select_images, MAX_SELECTED_IMAGES};
pub use style::{Style, StyleProfile, ALL_STYLES};
pub use worker::CommentWorker;
