use copilot_common::error::{CopilotError, CopilotResult};
use validator::Validate;

use crate::schema::{AskResponse, Confidence, ErrorCode, Source};

/// A recognized failure, described in terms the user can read.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub source: Source,
    pub code: ErrorCode,
    pub message: String,
    pub insufficient_data: bool,
}

impl ProviderFailure {
    pub fn new(source: Source, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            source,
            code,
            message: message.into(),
            insufficient_data: true,
        }
    }

    pub fn with_insufficient_data(mut self, insufficient_data: bool) -> Self {
        self.insufficient_data = insufficient_data;
        self
    }
}

/// Schema-valid degraded answer carrying the failure message verbatim.
pub fn provider_error_answer(failure: ProviderFailure) -> CopilotResult<AskResponse> {
    let response = AskResponse {
        answer: failure.message,
        insufficient_data: failure.insufficient_data,
        confidence: Confidence::Low,
        citations: vec![],
        evidence: vec![],
        demo: false,
        source: failure.source,
        error_code: Some(failure.code),
    };

    response
        .validate()
        .map_err(|e| CopilotError::Internal(format!("error answer failed validation: {e}")))?;
    Ok(response)
}
