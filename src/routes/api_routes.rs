use axum::extract::State;
use axum::Json;
use axum_cookie::prelude::*;
use nutri_assistant_core::{AssistantReply, AssistantRequest, SessionInfo};

use crate::agent::AssistantAgent;
use crate::errors::AppError;
use crate::routes::session::{SessionTokens, SessionUser};
use crate::service::chat_service::ChatService;

/// POST `/api/chat` — one assistant turn for the widget
pub async fn chat_handler<A: AssistantAgent>(
    _user: SessionUser,
    State(svc): State<ChatService<A>>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    svc.chat(request).await.map(Json)
}

/// GET `/api/session` — whether the caller's session would be accepted
pub async fn session_handler(
    State(tokens): State<SessionTokens>,
    cookies: CookieManager,
) -> Json<SessionInfo> {
    Json(SessionInfo {
        authenticated: tokens.accepts(&cookies),
    })
}

/// GET `/health`
pub async fn health_handler() -> &'static str {
    "ok"
}
