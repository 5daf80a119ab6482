use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopilotError {
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected input; the payload is handed back to the caller as `details`.
    #[error("validation error: {0}")]
    Validation(Value),

    /// A provider returned output that parsed as JSON but broke the agreed
    /// response schema.
    #[error("provider contract violated: {0}")]
    ProviderContract(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type CopilotResult<T> = Result<T, CopilotError>;
