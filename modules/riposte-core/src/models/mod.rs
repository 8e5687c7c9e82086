mod comment;
mod image;
mod post;
mod text;

pub use comment::Comment;
pub use image::{Image, NewImage};
pub use post::{Post, PostBundle};
pub use text::{SimilarText, Text};

use anyhow::Result;
use sqlx::PgPool;

/// Run the embedded SQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
