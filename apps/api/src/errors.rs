use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Rejects blank required input with a 400.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(e) if e.is_auth_failure() => {
                tracing::error!("LLM authentication failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_CONFIG_ERROR",
                    "AI service configuration error".to_string(),
                )
            }
            AppError::Llm(e) if e.is_rate_limited() => {
                tracing::warn!("LLM rate limited: {e}");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "AI service is busy. Please try again in a moment.".to_string(),
                )
            }
            AppError::Llm(e) if e.is_unavailable() => {
                tracing::error!("LLM unavailable: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LLM_UNAVAILABLE",
                    "AI service is temporarily unavailable".to_string(),
                )
            }
            AppError::Llm(e @ LlmError::ProviderNotConfigured(_)) => {
                (StatusCode::BAD_REQUEST, "MODEL_UNAVAILABLE", e.to_string())
            }
            AppError::Llm(e @ LlmError::Timeout { .. }) => {
                tracing::error!("LLM timeout: {e}");
                (StatusCode::GATEWAY_TIMEOUT, "LLM_TIMEOUT", e.to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
