//! Error taxonomy and its HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    /// Missing or invalid request input
    #[error("{0}")]
    ClientInput(String),

    /// A referenced file id has no file on disk
    #[error("{0}")]
    NotFound(String),

    /// The external tool reported a failure
    #[error("{0}")]
    Processing(String),

    /// Moving or writing a stored file failed
    #[error("{0}")]
    Io(String),

    #[error("external tool did not finish within {0} seconds")]
    Timeout(u64),
}

pub type VideoResult<T> = std::result::Result<T, VideoError>;

impl VideoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VideoError::ClientInput(_) => StatusCode::BAD_REQUEST,
            VideoError::NotFound(_) => StatusCode::NOT_FOUND,
            VideoError::Processing(_) | VideoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VideoError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

impl IntoResponse for VideoError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
