pub mod api_routes;
pub mod session;

use axum::extract::FromRef;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use axum_cookie::prelude::*;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::AssistantAgent;
use crate::errors::AppError;
use crate::service::chat_service::ChatService;
use api_routes::{chat_handler, health_handler, session_handler};
use session::SessionTokens;

#[derive(Clone)]
pub struct AppState<A> {
    pub chat: ChatService<A>,
    pub sessions: SessionTokens,
}

impl<A: Clone> FromRef<AppState<A>> for ChatService<A> {
    fn from_ref(state: &AppState<A>) -> Self {
        state.chat.clone()
    }
}

impl<A> FromRef<AppState<A>> for SessionTokens {
    fn from_ref(state: &AppState<A>) -> Self {
        state.sessions.clone()
    }
}

/// CORS for the wasm frontend, which calls with `credentials: include`.
pub fn cors_layer(frontend_origin: &str) -> Result<CorsLayer, AppError> {
    let origin = frontend_origin
        .parse::<HeaderValue>()
        .map_err(|e| AppError::Config(format!("FRONTEND_ORIGIN '{frontend_origin}': {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn router<A: AssistantAgent>(state: AppState<A>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/session", get(session_handler))
        .route("/api/chat", post(chat_handler::<A>))
        .layer(CookieLayer::default())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
