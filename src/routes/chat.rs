use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::assistant::{preview, ChatResponse};
use crate::state::AppState;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body.message.trim();
    if !message.is_empty() {
        info!("User: {}...", preview(message));
    }

    let reply = state.assistant.respond(message).await?;
    Ok(Json(reply))
}
