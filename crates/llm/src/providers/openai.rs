use std::time::Duration;

use async_trait::async_trait;
use copilot_config::OpenAiConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{OpenAiAdapter, OpenAiParams, ProviderError};

/// Responses API client using strict `json_schema` output.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl ResponsesBody {
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text.trim().to_owned();
        }

        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<String>()
            .trim()
            .to_owned()
    }
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
        })
    }
}

#[async_trait]
impl OpenAiAdapter for OpenAiClient {
    async fn ask(&self, params: OpenAiParams<'_>) -> Result<String, ProviderError> {
        let body = json!({
            "model": params.model,
            "input": [
                {
                    "role": "system",
                    "content": [{ "type": "input_text", "text": params.system_prompt }]
                },
                {
                    "role": "user",
                    "content": [{ "type": "input_text", "text": params.user_prompt }]
                }
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": "ask_response",
                    "schema": params.schema,
                    "strict": true
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(params.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (message, code) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(parsed) => (parsed.error.message, parsed.error.code),
                Err(_) => (text, None),
            };
            return Err(ProviderError::Status {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let parsed: ResponsesBody = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout_ms))?;
        Ok(parsed.into_text())
    }
}
