use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::chat::run_exchange;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<IncomingMessage>,
    /// Continues an existing conversation. A new id is minted when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub content: String,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub responses: Vec<ChatReply>,
    pub session_id: String,
}

/// POST /chat/
///
/// Only the last message's content is used as input; earlier turns come from the
/// session transcript.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let user_input = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .ok_or_else(|| AppError::Validation("messages cannot be empty".to_string()))?;

    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let reply = run_exchange(state.llm.as_ref(), &state.sessions, &session_id, user_input).await?;

    Ok(Json(ChatResponse {
        responses: vec![ChatReply {
            content: reply,
            role: "assistant",
        }],
        session_id,
    }))
}

/// DELETE /chat/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}
