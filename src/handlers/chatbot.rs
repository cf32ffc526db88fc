use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::startup::AppState;

/// Substituted when a successful upstream payload lacks the expected text
/// field. Part of the endpoint contract, not an error path.
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I could not understand your message.";

const MISSING_MESSAGE: &str = "Message is required";

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatReply>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation(MISSING_MESSAGE))?;

    let generated = state
        .generator
        .generate(&request.message)
        .await
        .map_err(AppError::ChatbotUpstream)?;

    // An empty reply is treated the same as a missing one
    let reply = generated
        .text
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| CHAT_FALLBACK_REPLY.to_string());

    tracing::info!(reply_len = reply.len(), "Chatbot reply generated");

    Ok((StatusCode::OK, Json(ChatReply { reply })))
}
