use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A chat-completion endpoint that answers with a single JSON object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete_json(&self, messages: &[ChatMessage]) -> Result<JsonValue>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Builds the client from config, or `None` when no API key is set.
    pub fn from_config(config: &Config) -> Result<Option<Arc<dyn LlmClient>>> {
        let Some(api_key) = config.openai_api_key.clone() else {
            tracing::warn!("OPENAI_API_KEY not set; AI features will return defaults");
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;
        Ok(Some(Arc::new(Self::new(
            client,
            api_key,
            config.openai_base_url.clone(),
            config.openai_model.clone(),
        ))))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete_json(&self, messages: &[ChatMessage]) -> Result<JsonValue> {
        let payload = json!({
            "model": self.model,
            "messages": messages,
            "response_format": { "type": "json_object" },
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;
        extract_json_content(&body)
    }
}

/// Pulls `choices[0].message.content` out of a completion body and parses it.
pub fn extract_json_content(body: &JsonValue) -> Result<JsonValue> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format"))?;
    Ok(serde_json::from_str(content)?)
}
