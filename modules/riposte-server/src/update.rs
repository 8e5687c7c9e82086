//! Telegram long-poll loop and inbound-event dispatch: direct messages
//! reply immediately, channel posts go through the deferred job path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use riposte_core::{InboundMessage, InboundPhoto};
use riposte_reply::Ingestor;
use telegram_client::{Message, TelegramBot, Update};
use tracing::{error, info};

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub async fn run_update_loop(bot: Arc<TelegramBot>, ingestor: Arc<Ingestor>) -> Result<()> {
    let mut offset: Option<i64> = None;

    loop {
        let updates = match bot.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                error!(error = %e, "getUpdates failed");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            dispatch(&ingestor, &update).await;
        }
    }
}

async fn dispatch(ingestor: &Ingestor, update: &Update) {
    if let Some(message) = &update.message {
        if !should_process(message) {
            return;
        }

        info!(
            message_id = message.message_id,
            from = message
                .from
                .as_ref()
                .and_then(|f| f.username.as_deref())
                .unwrap_or("unknown"),
            "Received message"
        );

        ingestor.handle_message(&normalize(message)).await;
    } else if let Some(post) = &update.channel_post {
        if !should_process(post) {
            return;
        }

        info!(message_id = post.message_id, "Received channel post");

        if let Err(e) = ingestor.handle_channel_message(&normalize(post)).await {
            error!(
                message_id = post.message_id,
                error = %e,
                "Error processing channel post"
            );
        }
    }
}

/// Bot senders and slash commands are ignored; everything else with
/// text, photos, or a sticker is processed.
fn should_process(message: &Message) -> bool {
    if message.from.as_ref().is_some_and(|f| f.is_bot) {
        return false;
    }
    if message.text.as_deref().is_some_and(|t| t.starts_with('/')) {
        return false;
    }

    message.text.is_some() || message.photo.is_some() || message.sticker.is_some()
}

fn normalize(message: &Message) -> InboundMessage {
    InboundMessage {
        channel_id: message.chat.id.to_string(),
        message_id: message.message_id,
        author_username: message.from.as_ref().and_then(|f| f.username.clone()),
        text: message.text.clone(),
        caption: message.caption.clone(),
        photos: message
            .photo
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| InboundPhoto {
                attachment_id: p.file_unique_id.clone(),
                file_id: p.file_id.clone(),
                width: p.width,
                height: p.height,
                file_size: p.file_size,
            })
            .collect(),
    }
}
