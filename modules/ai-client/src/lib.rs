mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};

use client::OpenAiClient;

/// Completion temperature used for generated comments.
const COMPLETION_TEMPERATURE: f32 = 0.5;
const COMPLETION_MAX_TOKENS: u32 = 5000;

/// OpenAI-compatible client configured for one chat model and one
/// embedding model with a fixed output dimensionality.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    embedding_model: String,
    embedding_dimensions: u32,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 256,
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_embedding_dimensions(mut self, dimensions: u32) -> Self {
        self.embedding_dimensions = dimensions;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Single-turn, non-streaming chat completion.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user))
            .temperature(COMPLETION_TEMPERATURE)
            .max_tokens(COMPLETION_MAX_TOKENS);

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }

    /// Create an embedding for one text. The vector length is always
    /// `embedding_dimensions`.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client()
            .embed(&self.embedding_model, self.embedding_dimensions, text)
            .await
    }
}
