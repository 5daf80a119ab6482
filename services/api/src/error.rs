use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use copilot_common::error::CopilotError;

pub struct ApiError(pub CopilotError);

impl From<CopilotError> for ApiError {
    fn from(err: CopilotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            CopilotError::Validation(details) => {
                let body = serde_json::json!({ "error": "Invalid request", "details": details });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => {
                // Only defects reach here; recognized provider failures are answers.
                tracing::error!(error = %other, "ask request failed (unexpected)");
                let body = serde_json::json!({ "error": "Internal error" });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
