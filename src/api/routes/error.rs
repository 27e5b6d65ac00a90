//! API error handling utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::generation_service::GenerationError;
use crate::storage::StorageError;

/// API error response. Every failure surfaces as `{ "error": ... }`
/// with an appropriate status; no endpoint returns a 2xx with an error
/// payload or vice versa.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message });
        (self.status, axum::Json(body)).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match err {
            GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GenerationError::NoCredential
            | GenerationError::NoContent
            | GenerationError::NoSvgFound => StatusCode::INTERNAL_SERVER_ERROR,
            // Generic message only; upstream detail stays in the logs.
            GenerationError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Operator-facing integration: the upstream detail goes into
        // the message, unlike generation errors.
        let message = match &err {
            StorageError::NotConfigured(msg) => msg.clone(),
            _ => format!("Failed to save metaphor: {err}"),
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}
