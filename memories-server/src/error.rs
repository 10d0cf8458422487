//! Error types for memories-server
//!
//! Every failure leaves the server as `{ "success": false, "error": "..." }`
//! with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use memories_common::api::auth::AccessError;
use memories_common::api::types::Failure;
use memories_ingest::IngestError;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or wrong access code (401)
    #[error(transparent)]
    Unauthorized(#[from] AccessError),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Memories file rejected by the ingest pipeline
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// memories-common error
    #[error(transparent)]
    Common(#[from] memories_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Ingest(_) => StatusCode::BAD_REQUEST,
            ApiError::Common(memories_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Common(memories_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Io(_) | ApiError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (status, Json(Failure::new(self.to_string()))).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", e))
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
