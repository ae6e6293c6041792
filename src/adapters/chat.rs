use crate::config::toml_config::{is_unset_secret, ChatConfig};
use crate::domain::ports::ChatProvider;
use crate::utils::error::{FetchError, Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// OpenAI 相容的 chat completions 端點 (OpenRouter)
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl OpenRouterClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::from)?;

        if is_unset_secret(&config.api_key) {
            tracing::warn!("⚠️ No chat API key configured, requests will likely be rejected");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn build_request(&self, question: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(question),
            ],
        }
    }
}

/// 取出 `choices[0].message.content`
pub fn extract_reply(body: &serde_json::Value) -> Result<String> {
    body.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| TrackerError::parse("Response has no choices[0].message.content"))
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, question: &str) -> Result<String> {
        tracing::debug!("Sending chat request to: {} (model={})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(question))
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        tracing::debug!("Chat response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(FetchError::from)?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| TrackerError::parse(format!("Chat response is not JSON: {}", e)))?;

        extract_reply(&body)
    }
}
