use std::future::Future;

use rig::client::Nothing;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::ollama;
use tracing::error;

use crate::errors::AppError;

const PREAMBLE: &str = "You are the assistant inside a nutrition tracking app. \
                        Help users with calories, macronutrients, meal ideas and simple workouts. \
                        Be concise, accurate, and friendly. \
                        You are not a doctor; suggest a professional for medical questions.";

/// Produces the assistant's reply to a single user message.
pub trait AssistantAgent: Clone + Send + Sync + 'static {
    fn reply(&self, message: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Answers chat turns with a local Ollama model through rig.
/// A fresh agent is built per request; the widget keeps no server-side history.
#[derive(Clone)]
pub struct OllamaAgentService {
    client: ollama::Client,
    base_url: String,
    model: String,
}

impl OllamaAgentService {
    pub fn new(base_url: &str, model: &str) -> Result<Self, AppError> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build Ollama client: {e:?}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }
}

impl AssistantAgent for OllamaAgentService {
    async fn reply(&self, message: &str) -> Result<String, AppError> {
        let agent = self.client.agent(&self.model).preamble(PREAMBLE).build();

        agent
            .chat(message, Vec::<RigMessage>::new())
            .await
            .map_err(|e| {
                error!(model = %self.model, "Ollama inference failed: {e}");
                classify_failure(e.to_string(), &self.base_url, &self.model)
            })
    }
}

/// Maps a rig error message onto the endpoint's error taxonomy.
fn classify_failure(message: String, base_url: &str, model: &str) -> AppError {
    if message.contains("Connection refused") || message.contains("connect") {
        AppError::InferenceUnavailable {
            host: base_url.to_string(),
        }
    } else if message.contains("model") {
        AppError::ModelNotFound {
            model_name: model.to_string(),
        }
    } else {
        AppError::InferenceError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_failure() {
        let base = "http://localhost:11434";
        assert!(matches!(
            classify_failure("error sending request: Connection refused".into(), base, "llama3.2"),
            AppError::InferenceUnavailable { host } if host == base
        ));
        assert!(matches!(
            classify_failure("model 'llama9' not found".into(), base, "llama9"),
            AppError::ModelNotFound { model_name } if model_name == "llama9"
        ));
        assert!(matches!(
            classify_failure("context length exceeded".into(), base, "llama3.2"),
            AppError::InferenceError { .. }
        ));
    }
}
