use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use copilot_common::error::CopilotError;
use copilot_llm::{AskRequest, AskResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::AppState;

pub async fn post_ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        CopilotError::Validation(serde_json::json!({ "body": rejection.body_text() }))
    })?;

    body.validate().map_err(|errors| {
        CopilotError::Validation(serde_json::to_value(&errors).unwrap_or_default())
    })?;

    tracing::info!(len = body.question.chars().count(), "ask request received");

    let response = state.engine.answer(&state.llm, &body.question).await?;
    Ok(Json(response))
}
