use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Remote service error: {0}")]
    RemoteService(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::EmptyInput(_) => (StatusCode::BAD_REQUEST, "EMPTY_INPUT"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::RemoteService(_) => (StatusCode::BAD_GATEWAY, "REMOTE_SERVICE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::Validation(msg)
            | AppError::EmptyInput(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            // Remote failures gate a user action, so the user sees the full reason.
            AppError::RemoteService(msg) => {
                tracing::error!("Remote service error: {msg}");
                msg.clone()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
