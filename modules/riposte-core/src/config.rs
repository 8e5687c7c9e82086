use anyhow::Result;

/// How accepted image attachments are turned into stored Image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAcquisition {
    /// Keep the transport's file reference: generated storage key, public
    /// URL resolved through the transport. No object store involved.
    #[default]
    TransportRef,
    /// Download the bytes through the transport and upload them to the
    /// object store; the store provides key and public URL.
    StoreUpload,
}

impl ImageAcquisition {
    fn parse(value: &str) -> Self {
        match value {
            "store-upload" => ImageAcquisition::StoreUpload,
            _ => ImageAcquisition::TransportRef,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub database_url: String,

    // Transport
    pub telegram_bot_token: String,

    // AI provider. Absence is a per-call failure, never a startup failure:
    // the pipeline degrades to fallback values instead.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub embedding_model: String,

    // Object storage (used by the StoreUpload acquisition mode)
    pub storage_dir: String,
    pub storage_public_url: String,

    // Pipeline
    pub image_acquisition: ImageAcquisition,
    pub comment_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")?,
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            storage_dir: std::env::var("STORAGE_DIR").unwrap_or_else(|_| "storage".to_string()),
            storage_public_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8080/storage".to_string()),
            image_acquisition: std::env::var("IMAGE_ACQUISITION")
                .map(|v| ImageAcquisition::parse(&v))
                .unwrap_or_default(),
            comment_delay_ms: std::env::var("COMMENT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  TELEGRAM_BOT_TOKEN: {}", preview(&self.telegram_bot_token));
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);
        tracing::info!("  IMAGE_ACQUISITION: {:?}", self.image_acquisition);
        tracing::info!("  COMMENT_DELAY_MS: {}", self.comment_delay_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_acquisition_parses_known_values() {
        assert_eq!(
            ImageAcquisition::parse("store-upload"),
            ImageAcquisition::StoreUpload
        );
        assert_eq!(
            ImageAcquisition::parse("transport-ref"),
            ImageAcquisition::TransportRef
        );
        assert_eq!(
            ImageAcquisition::parse("garbage"),
            ImageAcquisition::TransportRef
        );
    }
}
