mod agent;
mod config;
mod errors;
mod routes;
mod service;

use tracing::info;

use crate::agent::OllamaAgentService;
use crate::config::Config;
use crate::routes::session::SessionTokens;
use crate::routes::{cors_layer, router, AppState};
use crate::service::chat_service::ChatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutri_assistant=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.session_tokens.is_empty() {
        tracing::warn!("SESSION_TOKENS is empty; every chat request will be rejected");
    }

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let agent = OllamaAgentService::new(&config.ollama_base_url, &config.model)?;
    let state = AppState {
        chat: ChatService::new(agent),
        sessions: SessionTokens::new(config.session_tokens.clone()),
    };
    let app = router(state, cors_layer(&config.frontend_origin)?);

    info!(model = %config.model, ollama = %config.ollama_base_url, "assistant agent configured");

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
