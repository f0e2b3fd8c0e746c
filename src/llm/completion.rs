use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{LlmConfig, CHAT_MODEL, CHAT_TEMPERATURE};
use crate::error::MapError;

/// A hosted language model: prompt in, raw text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, MapError>;
}

/// OpenAI-compatible `/v1/chat/completions` client (Groq by default).
pub struct ChatCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatCompletionClient {
    /// Returns `None` when the config carries no usable credentials; the
    /// mapper then runs on the keyword fallback for the whole process.
    pub fn from_config(client: reqwest::Client, config: &LlmConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let api_key = config.api_key.clone()?;
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, MapError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let req = OpenAiChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: CHAT_TEMPERATURE,
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await
            .context("Failed to call chat completion API")
            .map_err(MapError::Backend)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(MapError::Backend(anyhow::anyhow!(
                "Chat completion API returned {status}: {body}"
            )));
        }

        let body: OpenAiChatResponse = resp
            .json()
            .await
            .context("Failed to parse chat completion response")
            .map_err(MapError::Backend)?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MapError::Backend(anyhow::anyhow!("Chat completion returned no content")))
    }
}
