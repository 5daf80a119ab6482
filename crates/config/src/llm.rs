use copilot_common::error::CopilotResult;
use serde::Deserialize;
use std::fmt;

use crate::env::{get_opt_var, get_var_or, parse_var};

/// Upstream model source used when demo mode is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Ollama,
}

impl LlmProvider {
    /// Anything other than `ollama` selects the hosted provider.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ollama") => Self::Ollama,
            _ => Self::OpenAi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

/// What to do when the selected provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Degrade to the offline demo answerer.
    Demo,
    /// Surface an explicit error answer.
    #[default]
    None,
}

impl FallbackPolicy {
    /// Explicit only: demo fallback is enabled by the exact value `demo`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("demo") => Self::Demo,
            _ => Self::None,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl OpenAiConfig {
    /// The key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_owned(),
            base_url: "https://api.openai.com/v1".to_owned(),
            timeout_ms: 30_000,
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &mask_key(self.api_key()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_owned(),
            model: "llama3.1:8b".to_owned(),
            timeout_ms: 12_000,
        }
    }
}

/// Everything the ask engine consults on a call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    pub demo_mode: bool,
    pub provider: LlmProvider,
    pub fallback: FallbackPolicy,
    pub openai: OpenAiConfig,
    pub ollama: OllamaConfig,
}

impl LlmConfig {
    pub fn from_env() -> CopilotResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            demo_mode: get_opt_var("DEMO_MODE").as_deref() == Some("true"),
            provider: LlmProvider::parse(get_opt_var("LLM_PROVIDER").as_deref()),
            fallback: FallbackPolicy::parse(get_opt_var("FALLBACK_PROVIDER").as_deref()),
            openai: OpenAiConfig {
                api_key: get_opt_var("OPENAI_API_KEY"),
                model: get_var_or("OPENAI_MODEL", &defaults.openai.model),
                base_url: get_var_or("OPENAI_BASE_URL", &defaults.openai.base_url),
                timeout_ms: parse_var("OPENAI_TIMEOUT_MS", "30000")?,
            },
            ollama: OllamaConfig {
                base_url: get_var_or("OLLAMA_BASE_URL", &defaults.ollama.base_url),
                model: get_var_or("OLLAMA_MODEL", &defaults.ollama.model),
                timeout_ms: parse_var("LLM_TIMEOUT_MS", "12000")?,
            },
        })
    }
}

/// Render a credential for logs: first 6 and last 4 characters only.
pub fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(none)".to_owned(),
        Some(k) => {
            let chars: Vec<char> = k.chars().collect();
            if chars.len() <= 10 {
                return "*".repeat(chars.len());
            }
            let head: String = chars[..6].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}
