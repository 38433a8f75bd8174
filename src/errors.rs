use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors raised while serving the assistant endpoint.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Inference errors ─────────────────────────────────────────────────────
    #[error("Inference service unavailable at {host}")]
    InferenceUnavailable { host: String },

    #[error("Model '{model_name}' not found")]
    ModelNotFound { model_name: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong {
        field_name: String,
        max_length: usize,
        actual_length: usize,
    },

    // ── Session errors ───────────────────────────────────────────────────────
    #[error("A valid session is required")]
    Unauthorized,

    // ── System errors ────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyField { .. } | AppError::FieldTooLong { .. })
    }

    pub fn is_agent_unavailable(&self) -> bool {
        matches!(self, AppError::InferenceUnavailable { .. })
    }

    pub fn status(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.is_agent_unavailable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            match self {
                AppError::Unauthorized => StatusCode::UNAUTHORIZED,
                AppError::ModelNotFound { .. } | AppError::InferenceError { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Upstream and internal details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "assistant request failed");
            "The assistant is unavailable right now".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
