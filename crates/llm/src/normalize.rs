use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::schema::{AskResponse, Source};

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("provider output is not a JSON object")]
    NotAnObject,

    #[error("provider output has the wrong shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("provider output breaks response constraints: {0}")]
    Constraint(#[from] ValidationErrors),
}

/// Force a decoded provider object into the canonical response.
///
/// Only `citations` and `evidence` are repaired (to empty arrays when they
/// are not arrays); `demo` and `source` are overwritten. Every other field
/// must already be well-typed.
pub fn normalize_provider_object(
    raw: &Value,
    source: Source,
) -> Result<AskResponse, NormalizationError> {
    let Value::Object(fields) = raw else {
        return Err(NormalizationError::NotAnObject);
    };

    let mut normalized = fields.clone();
    for key in ["citations", "evidence"] {
        if !normalized.get(key).is_some_and(Value::is_array) {
            normalized.insert(key.to_owned(), Value::Array(vec![]));
        }
    }
    normalized.insert("demo".to_owned(), Value::Bool(false));
    normalized.insert("source".to_owned(), serde_json::to_value(source)?);

    let response: AskResponse = serde_json::from_value(Value::Object(normalized))?;
    response.validate()?;
    Ok(response)
}
