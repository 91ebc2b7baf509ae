pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::conversation::handlers as chat;
use crate::matching::handlers as matching;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/hello", get(health::hello_handler))
        .route("/health", get(health::health_handler))
        // Chat
        .route("/chat/", post(chat::handle_chat))
        .route("/chat/sessions/:id", delete(chat::handle_delete_session))
        // Profile extraction
        .route("/extract_profile/", post(profile::handle_extract_profile))
        // Job matching
        .route("/filter_jobs", post(matching::handle_filter_jobs))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
