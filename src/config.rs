use std::collections::HashSet;

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:8081";

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ollama_base_url: String,
    pub model: String,
    /// Session tokens the assistant endpoint accepts.
    pub session_tokens: HashSet<String>,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("PORT must be a port number, got '{raw}'")))?,
            None => DEFAULT_PORT,
        };

        let session_tokens = lookup("SESSION_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port,
            ollama_base_url: lookup("OLLAMA_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: lookup("ASSISTANT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            session_tokens,
            frontend_origin: lookup("FRONTEND_ORIGIN")
                .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string()),
        })
    }
}
