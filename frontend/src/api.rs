use std::future::Future;

use gloo_net::http::Request;
use nutri_assistant_core::{
    AssistantReply, AssistantRequest, ChatTransport, RequestError, SessionInfo, decode_reply,
};
use web_sys::RequestCredentials;

/// Base URL of the assistant endpoint.
const API_BASE: &str = "http://localhost:8080";

/// Talks to `POST /api/chat` with the browser's session cookie attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransport;

impl ChatTransport for HttpTransport {
    fn send(
        &self,
        request: AssistantRequest,
    ) -> impl Future<Output = Result<AssistantReply, RequestError>> {
        send_chat(request)
    }
}

/// Sends one chat turn. Any non-2xx status is an error.
pub async fn send_chat(body: AssistantRequest) -> Result<AssistantReply, RequestError> {
    let resp = Request::post(&format!("{API_BASE}/api/chat"))
        .credentials(RequestCredentials::Include)
        .json(&body)
        .map_err(|e| RequestError::Transport(format!("Serialize error: {e}")))?
        .send()
        .await
        .map_err(|e| RequestError::Transport(e.to_string()))?;

    if !resp.ok() {
        return Err(RequestError::Status(resp.status()));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| RequestError::Malformed(e.to_string()))?;
    decode_reply(&text)
}

/// Asks the backend whether the current session is signed in.
pub async fn fetch_session() -> Result<SessionInfo, RequestError> {
    let resp = Request::get(&format!("{API_BASE}/api/session"))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| RequestError::Transport(e.to_string()))?;

    if !resp.ok() {
        return Err(RequestError::Status(resp.status()));
    }

    resp.json::<SessionInfo>()
        .await
        .map_err(|e| RequestError::Malformed(e.to_string()))
}
