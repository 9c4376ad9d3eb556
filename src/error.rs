//! Unified application error model and HTTP mapping.
//! Every handler failure ends up as one of these variants, which renders as a
//! terminal `{"error": "<message>"}` response with the matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    UserInput { code: String, message: String },
    #[error("{code}: {message}")]
    Auth { code: String, message: String },
    #[error("{code}: {message}")]
    Unauthorized { code: String, message: String },
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },
    #[error("{code}: {message}")]
    MethodNotAllowed { code: String, message: String },
    #[error("{code}: {message}")]
    NotImplemented { code: String, message: String },
    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::MethodNotAllowed { code, .. }
            | AppError::NotImplemented { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::MethodNotAllowed { message, .. }
            | AppError::NotImplemented { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn auth(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn not_found(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn not_implemented(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::NotImplemented { code: code.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Gate rejection. The message is the same for every cause.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized { code: "unauthorized".into(), message: "Unauthorized".into() }
    }

    pub fn method_not_allowed() -> Self {
        AppError::MethodNotAllowed { code: "method_not_allowed".into(), message: "Method not allowed".into() }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::UserInput { .. } => StatusCode::BAD_REQUEST,
            AppError::Auth { .. } | AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal details stay in the log; the caller only sees an opaque message.
        let message = match &self {
            AppError::Internal { code, message } => {
                tracing::error!(code = %code, "internal failure: {}", message);
                "Internal server error"
            }
            other => other.message(),
        };
        (self.http_status(), Json(json!({ "error": message }))).into_response()
    }
}
