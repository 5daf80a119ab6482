use std::future::Future;
use std::time::Duration;

use copilot_common::error::{CopilotError, CopilotResult};
use copilot_config::{mask_key, FallbackPolicy, LlmConfig, LlmProvider};
use serde_json::Value;

use crate::dataset::SampleData;
use crate::demo::demo_answer;
use crate::error_answer::{provider_error_answer, ProviderFailure};
use crate::normalize::normalize_provider_object;
use crate::prompt::Prompts;
use crate::providers::{OllamaAdapter, OllamaParams, OpenAiAdapter, OpenAiParams, ProviderError};
use crate::schema::{model_json_schema, AskResponse, ErrorCode, Source};

const OPENAI_MISSING_KEY: &str =
    "OpenAI provider selected but OPENAI_API_KEY is missing. Set OPENAI_API_KEY or switch LLM_PROVIDER.";
const OPENAI_QUOTA: &str =
    "OpenAI quota/billing is unavailable for this key/project. Check billing or switch provider.";
const OPENAI_FAILED: &str = "OpenAI provider failed to respond. Please try again.";
const OLLAMA_TIMEOUT: &str = "Ollama timed out. Try again or increase LLM_TIMEOUT_MS.";
const OLLAMA_UNAVAILABLE: &str = "Ollama provider is unavailable. Is Ollama running locally?";

/// Routes a question to demo mode or a live provider and always produces a
/// schema-valid answer for every recognized outcome.
///
/// `Err` is reserved for defects: a provider reply that parsed as JSON but
/// broke the response schema, or an internally built answer that failed
/// validation.
pub struct AskEngine<O: OpenAiAdapter, L: OllamaAdapter> {
    openai: O,
    ollama: L,
    dataset: SampleData,
}

impl<O: OpenAiAdapter, L: OllamaAdapter> AskEngine<O, L> {
    pub fn new(openai: O, ollama: L, dataset: SampleData) -> Self {
        Self {
            openai,
            ollama,
            dataset,
        }
    }

    pub async fn answer(&self, config: &LlmConfig, question: &str) -> CopilotResult<AskResponse> {
        // Explicit demo mode always wins
        if config.demo_mode {
            return demo_answer(&self.dataset, question);
        }

        let prompts = Prompts::build(&self.dataset, question)?;

        match config.provider {
            LlmProvider::OpenAi => self.ask_openai(config, question, &prompts).await,
            LlmProvider::Ollama => self.ask_ollama(config, question, &prompts).await,
        }
    }

    async fn ask_openai(
        &self,
        config: &LlmConfig,
        question: &str,
        prompts: &Prompts,
    ) -> CopilotResult<AskResponse> {
        let Some(api_key) = config.openai.api_key() else {
            tracing::warn!(provider = "openai", "OPENAI_API_KEY is not set");
            return self.degrade(
                config.fallback,
                question,
                ProviderFailure::new(Source::OpenAi, ErrorCode::Misconfigured, OPENAI_MISSING_KEY),
            );
        };

        tracing::info!(
            provider = "openai",
            model = %config.openai.model,
            key = %mask_key(Some(api_key)),
            "using openai"
        );

        let schema = model_json_schema();
        let call = self.openai.ask(OpenAiParams {
            api_key,
            model: &config.openai.model,
            system_prompt: &prompts.system,
            user_prompt: &prompts.user,
            schema: &schema,
        });

        match with_deadline(config.openai.timeout_ms, call).await {
            Ok(raw) => self.parse_provider_output(&raw, Source::OpenAi, config.fallback, question),
            Err(err) => {
                tracing::warn!(
                    provider = "openai",
                    status = ?err.status(),
                    code = ?err.code(),
                    error = %err,
                    "provider call failed"
                );
                self.degrade(config.fallback, question, classify_openai_failure(&err))
            }
        }
    }

    async fn ask_ollama(
        &self,
        config: &LlmConfig,
        question: &str,
        prompts: &Prompts,
    ) -> CopilotResult<AskResponse> {
        let ollama = &config.ollama;
        tracing::info!(
            provider = "ollama",
            base_url = %ollama.base_url,
            model = %ollama.model,
            "using ollama"
        );

        let call = self.ollama.ask(OllamaParams {
            base_url: &ollama.base_url,
            model: &ollama.model,
            system_prompt: &prompts.system,
            user_prompt: &prompts.user,
            timeout_ms: ollama.timeout_ms,
        });

        match with_deadline(ollama.timeout_ms, call).await {
            Ok(raw) => self.parse_provider_output(&raw, Source::Ollama, config.fallback, question),
            Err(err) => {
                tracing::warn!(provider = "ollama", error = %err, "provider call failed");
                self.degrade(config.fallback, question, classify_ollama_failure(&err))
            }
        }
    }

    /// Empty and non-JSON output are recognized failures; a JSON reply that
    /// cannot be normalized is a broken adapter contract.
    fn parse_provider_output(
        &self,
        raw: &str,
        source: Source,
        fallback: FallbackPolicy,
        question: &str,
    ) -> CopilotResult<AskResponse> {
        let raw = raw.trim();
        if raw.is_empty() {
            tracing::warn!(?source, "provider returned an empty response");
            return self.degrade(
                fallback,
                question,
                ProviderFailure::new(source, ErrorCode::BadProviderOutput, empty_message(source)),
            );
        }

        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(?source, error = %e, "provider returned invalid JSON");
                return self.degrade(
                    fallback,
                    question,
                    ProviderFailure::new(
                        source,
                        ErrorCode::BadProviderOutput,
                        invalid_json_message(source),
                    ),
                );
            }
        };

        normalize_provider_object(&value, source).map_err(|e| {
            tracing::error!(?source, error = %e, "provider output violated the response schema");
            CopilotError::ProviderContract(e.to_string())
        })
    }

    /// Demo fallback is unconditional once enabled; it does not look at the
    /// failure kind.
    fn degrade(
        &self,
        fallback: FallbackPolicy,
        question: &str,
        failure: ProviderFailure,
    ) -> CopilotResult<AskResponse> {
        match fallback {
            FallbackPolicy::Demo => demo_answer(&self.dataset, question),
            FallbackPolicy::None => provider_error_answer(failure),
        }
    }
}

/// Bound a provider call; on expiry the in-flight future is dropped.
async fn with_deadline<F>(timeout_ms: u64, call: F) -> Result<String, ProviderError>
where
    F: Future<Output = Result<String, ProviderError>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            after_ms: timeout_ms,
        }),
    }
}

fn classify_openai_failure(err: &ProviderError) -> ProviderFailure {
    if err.code() == Some("insufficient_quota") {
        return ProviderFailure::new(Source::OpenAi, ErrorCode::QuotaExceeded, OPENAI_QUOTA);
    }
    if err.status() == Some(429) {
        return ProviderFailure::new(Source::OpenAi, ErrorCode::RateLimited, OPENAI_QUOTA);
    }

    let code = match err {
        ProviderError::Timeout { .. } => ErrorCode::Timeout,
        ProviderError::Unreachable(_) => ErrorCode::ProviderUnavailable,
        ProviderError::Status { status, .. } if *status >= 500 => ErrorCode::ProviderUnavailable,
        _ => ErrorCode::Unknown,
    };
    ProviderFailure::new(Source::OpenAi, code, OPENAI_FAILED)
}

fn classify_ollama_failure(err: &ProviderError) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::new(Source::Ollama, ErrorCode::Timeout, OLLAMA_TIMEOUT)
    } else {
        ProviderFailure::new(Source::Ollama, ErrorCode::ProviderUnavailable, OLLAMA_UNAVAILABLE)
    }
}

fn empty_message(source: Source) -> &'static str {
    match source {
        Source::Ollama => "Ollama returned an empty response.",
        _ => "OpenAI returned an empty response.",
    }
}

fn invalid_json_message(source: Source) -> &'static str {
    match source {
        Source::Ollama => {
            "Ollama returned non-JSON output. Ensure the model supports JSON format and the prompt forbids extra text."
        }
        _ => "OpenAI returned invalid JSON.",
    }
}
