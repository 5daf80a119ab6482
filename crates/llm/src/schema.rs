use copilot_config::LlmProvider;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

pub const MAX_CITATIONS: u64 = 10;
pub const MAX_EVIDENCE: u64 = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 3, max = 800))]
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Which subsystem produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Demo,
    OpenAi,
    Ollama,
}

impl From<LlmProvider> for Source {
    fn from(provider: LlmProvider) -> Self {
        match provider {
            LlmProvider::OpenAi => Self::OpenAi,
            LlmProvider::Ollama => Self::Ollama,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Misconfigured,
    ProviderUnavailable,
    Timeout,
    RateLimited,
    QuotaExceeded,
    BadProviderOutput,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Evidence {
    pub fn at(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            note: None,
        }
    }
}

/// The canonical answer shape returned on every path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    #[validate(length(min = 1))]
    pub answer: String,
    pub insufficient_data: bool,
    pub confidence: Confidence,
    #[validate(length(max = 10))]
    pub citations: Vec<String>,
    #[validate(length(max = 10))]
    pub evidence: Vec<Evidence>,
    pub demo: bool,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

/// JSON schema handed to the hosted provider's strict structured-output mode.
///
/// Strict mode requires every property to be listed in `required`, so
/// `evidence[].note` is left out entirely.
pub fn model_json_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "answer": { "type": "string" },
            "insufficientData": { "type": "boolean" },
            "confidence": { "type": "string", "enum": ["low", "medium", "high"] },
            "citations": {
                "type": "array",
                "items": { "type": "string" },
                "maxItems": MAX_CITATIONS
            },
            "evidence": {
                "type": "array",
                "maxItems": MAX_EVIDENCE,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "path": { "type": "string" }
                    },
                    "required": ["path"]
                }
            }
        },
        "required": ["answer", "insufficientData", "confidence", "citations", "evidence"]
    })
}
