use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{OllamaAdapter, OllamaParams, ProviderError};

#[derive(Clone, Default)]
pub struct OllamaClient {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OllamaAdapter for OllamaClient {
    async fn ask(&self, params: OllamaParams<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", params.base_url.trim_end_matches('/'));
        let body = json!({
            "model": params.model,
            "stream": false,
            "format": "json",
            "options": { "temperature": 0 },
            "messages": [
                { "role": "system", "content": params.system_prompt },
                { "role": "user", "content": params.user_prompt }
            ]
        });

        let response = self
            .client
            .post(url)
            .timeout(Duration::from_millis(params.timeout_ms))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, params.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                code: None,
                message: format!("Ollama error {}: {text}", status.as_u16()),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, params.timeout_ms))?;

        Ok(parsed
            .message
            .and_then(|m| m.content)
            .unwrap_or_default()
            .trim()
            .to_owned())
    }
}
