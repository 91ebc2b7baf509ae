mod config;
mod conversation;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod profile;
mod prompting;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: a missing GOOGLE_API_KEY stops startup here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job-match API v{}", env!("CARGO_PKG_VERSION"));

    let llm = GeminiClient::new(config.google_api_key.clone(), config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout.as_secs()
    );

    let state = AppState::new(Arc::new(llm), config.clone());

    if config.memory_max_exchanges == 0 {
        info!("Conversation memory: unbounded per session");
    } else {
        info!(
            "Conversation memory: last {} exchanges per session",
            config.memory_max_exchanges
        );
    }
    state.sessions.spawn_sweeper(config.session_sweep_interval);
    info!(
        "Session sweeper running every {}s (ttl {}s)",
        config.session_sweep_interval.as_secs(),
        config.session_ttl.as_secs()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
