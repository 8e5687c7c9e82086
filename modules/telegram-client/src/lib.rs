pub mod error;
pub mod types;

pub use error::{Result, TelegramError};
pub use types::{
    Chat, File, InputMedia, Message, PhotoSize, SentMessage, Sticker, Update, User,
};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;
use types::ApiResponse;

const BASE_URL: &str = "https://api.telegram.org";

pub struct TelegramBot {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Public URL for a file path returned by `getFile`.
    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn read_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api {
                status: status.as_u16(),
                description: body,
            });
        }

        let api_resp: ApiResponse<T> = resp.json().await?;
        match (api_resp.ok, api_resp.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api {
                status: status.as_u16(),
                description: api_resp
                    .description
                    .unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }

    /// Send a plain text message, optionally as a reply.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(id) = reply_to_message_id {
            body["reply_to_message_id"] = serde_json::json!(id);
        }

        debug!(chat_id, "sendMessage");

        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        Self::read_response(resp).await
    }

    /// Send an album of photos. Uploaded items become multipart parts
    /// referenced with `attach://`; URL items pass through unchanged.
    pub async fn send_media_group(
        &self,
        chat_id: &str,
        media: Vec<InputMedia>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Vec<SentMessage>> {
        let mut descriptors = Vec::with_capacity(media.len());
        let mut form = reqwest::multipart::Form::new().text("chat_id", chat_id.to_string());

        for (i, item) in media.into_iter().enumerate() {
            match item {
                InputMedia::Url { url, caption } => {
                    descriptors.push(media_descriptor(url, caption));
                }
                InputMedia::Upload {
                    data,
                    filename,
                    caption,
                } => {
                    let part_name = format!("file{i}");
                    descriptors.push(media_descriptor(format!("attach://{part_name}"), caption));
                    let part =
                        reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename);
                    form = form.part(part_name, part);
                }
            }
        }

        form = form.text("media", serde_json::to_string(&descriptors)?);
        if let Some(id) = reply_to_message_id {
            form = form.text("reply_to_message_id", id.to_string());
        }

        debug!(chat_id, items = descriptors.len(), "sendMediaGroup");

        let resp = self
            .client
            .post(self.method_url("sendMediaGroup"))
            .multipart(form)
            .send()
            .await?;

        Self::read_response(resp).await
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        let resp = self
            .client
            .post(self.method_url("getFile"))
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await?;

        Self::read_response(resp).await
    }

    /// Resolve a file id to its downloadable URL.
    pub async fn resolve_file_url(&self, file_id: &str) -> Result<String> {
        let file = self.get_file(file_id).await?;
        let path = file.file_path.ok_or_else(|| TelegramError::Api {
            status: 200,
            description: format!("getFile returned no file_path for {file_id}"),
        })?;
        Ok(self.file_url(&path))
    }

    pub async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        let url = self.resolve_file_url(file_id).await?;
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TelegramError::Api {
                status: status.as_u16(),
                description: format!("file download failed for {file_id}"),
            });
        }

        Ok(resp.bytes().await?)
    }

    /// Long-poll for updates. Blocks up to `timeout_secs` server-side.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "channel_post"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }

        let resp = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&body)
            .timeout(std::time::Duration::from_secs(timeout_secs + 10))
            .send()
            .await?;

        Self::read_response(resp).await
    }
}

fn media_descriptor(media: String, caption: Option<String>) -> serde_json::Value {
    let mut descriptor = serde_json::json!({
        "type": "photo",
        "media": media,
    });
    if let Some(caption) = caption {
        descriptor["caption"] = serde_json::Value::String(caption);
    }
    descriptor
}
