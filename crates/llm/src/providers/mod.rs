pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde_json::Value;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("request aborted (timeout after {after_ms}ms)")]
    Timeout { after_ms: u64 },

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Typed timeouts, plus the loose "abort"/"timeout" message convention
    /// some adapters still rely on.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("abort") || message.contains("timeout")
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                after_ms: timeout_ms,
            }
        } else if err.is_connect() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

pub struct OpenAiParams<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub schema: &'a Value,
}

pub struct OllamaParams<'a> {
    pub base_url: &'a str,
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub timeout_ms: u64,
}

/// Hosted provider with strict structured output. Returns the raw text.
#[async_trait]
pub trait OpenAiAdapter: Send + Sync {
    async fn ask(&self, params: OpenAiParams<'_>) -> Result<String, ProviderError>;
}

/// Locally hosted provider. Returns the raw text, possibly empty.
#[async_trait]
pub trait OllamaAdapter: Send + Sync {
    async fn ask(&self, params: OllamaParams<'_>) -> Result<String, ProviderError>;
}
