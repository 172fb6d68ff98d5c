//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Every `/api/*` handler returns
//! `Result<T, AppError>` and every error body is `{"error": <message>}`.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Message returned for any failure whose details stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Store operation failed; `context` is what the client sees.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a store failure with the message shown to the client.
    #[must_use]
    pub const fn store(context: &'static str, source: RepositoryError) -> Self {
        Self::Store { context, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(AuthError::InvalidCredentials | AuthError::UserAlreadyExists) => {
                StatusCode::BAD_REQUEST
            }
            Self::Auth(_) | Self::Store { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(AuthError::UserAlreadyExists) => "Email already exists".to_string(),
            Self::Store { context, .. } => (*context).to_string(),
            // Don't expose internal error details to clients
            Self::Auth(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
