use std::sync::Arc;

use crate::config::Config;
use crate::conversation::session::SessionStore;
use crate::extraction::DocumentTextExtractor;
use crate::llm_client::CompletionGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Default: `GeminiClient`; tests swap in stubs.
    pub llm: Arc<dyn CompletionGateway>,
    /// Per-session conversation transcripts for `/chat/`.
    pub sessions: SessionStore,
    pub extractor: DocumentTextExtractor,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionGateway>, config: Config) -> Self {
        Self {
            llm,
            sessions: SessionStore::new(config.memory_max_exchanges, config.session_ttl),
            extractor: DocumentTextExtractor::new(
                config.antiword_path.clone(),
                config.antiword_timeout,
            ),
            config,
        }
    }
}
