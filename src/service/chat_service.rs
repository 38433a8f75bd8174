use nutri_assistant_core::{AssistantReply, AssistantRequest};
use tracing::{debug, info};

use crate::agent::AssistantAgent;
use crate::errors::AppError;

const MAX_MESSAGE_LENGTH: usize = 4000;

#[derive(Clone)]
pub struct ChatService<A> {
    agent: A,
}

impl<A: AssistantAgent> ChatService<A> {
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    /// Runs one assistant turn for the widget.
    pub async fn chat(&self, request: AssistantRequest) -> Result<AssistantReply, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::EmptyField {
                field_name: "message".to_string(),
            });
        }
        let length = message.chars().count();
        if length > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: length,
            });
        }

        // ── Ask the agent ─────────────────────────────────────────────────────
        debug!(chars = length, "forwarding chat turn to agent");
        let response = self.agent.reply(message).await?;
        info!(chars = response.chars().count(), "assistant replied");

        Ok(AssistantReply { response })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Agent double: echoes the message, or fails with a fixed error.
    #[derive(Clone, Default)]
    pub(crate) struct StubAgent {
        pub fail_with: Option<fn() -> AppError>,
        pub seen: Arc<Mutex<Vec<String>>>,
    }

    impl AssistantAgent for StubAgent {
        async fn reply(&self, message: &str) -> Result<String, AppError> {
            self.seen.lock().unwrap().push(message.to_string());
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(format!("echo: {message}")),
            }
        }
    }

    fn request(message: &str) -> AssistantRequest {
        AssistantRequest { message: message.to_string() }
    }

    #[tokio::test]
    async fn test_chat_returns_agent_reply() {
        let agent = StubAgent::default();
        let svc = ChatService::new(agent.clone());

        let reply = svc.chat(request("  Calories in an egg?  ")).await.unwrap();

        assert_eq!(reply.response, "echo: Calories in an egg?");
        assert_eq!(*agent.seen.lock().unwrap(), vec!["Calories in an egg?".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_message_never_reaches_agent() {
        let agent = StubAgent::default();
        let svc = ChatService::new(agent.clone());

        let err = svc.chat(request(" \n ")).await.unwrap_err();

        assert!(matches!(err, AppError::EmptyField { .. }));
        assert!(agent.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overlong_message_is_rejected() {
        let svc = ChatService::new(StubAgent::default());
        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);

        let err = svc.chat(request(&long)).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::FieldTooLong { actual_length, .. } if actual_length == MAX_MESSAGE_LENGTH + 1
        ));
    }

    #[tokio::test]
    async fn test_agent_error_propagates() {
        let agent = StubAgent {
            fail_with: Some(|| AppError::InferenceUnavailable {
                host: "http://ollama".into(),
            }),
            ..Default::default()
        };
        let svc = ChatService::new(agent);

        let err = svc.chat(request("hi")).await.unwrap_err();
        assert!(err.is_agent_unavailable());
    }
}
