use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /hello
/// Smoke-test endpoint.
pub async fn hello_handler() -> Json<Value> {
    Json(json!({ "message": "hello_world" }))
}

/// GET /health
/// Reports the configured model. Does not call it.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.llm.model(),
        "memory_enabled": true,
        "system_prompt": "Configurado"
    }))
}
