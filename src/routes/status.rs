use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Oncosimis AI Assistant API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "model": state.backend().model(),
        "documents": state.corpus().len(),
    }))
}

/// GET /health. Probes the model server on every call.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let ollama = if state.backend().is_available().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": "healthy",
        "ollama": ollama,
        "model": state.backend().model(),
        "documents_loaded": state.corpus().len(),
        "backend": "running",
    }))
}
