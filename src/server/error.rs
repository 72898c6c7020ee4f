//! # API Error Types
//!
//! Errors surfaced by request handlers. Every variant renders as a JSON body
//! `{"error": message}` with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::storage::StoreError;

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Unknown route or missing static asset
    NotFound(String),
    /// Unparseable body or path parameter
    BadRequest(String),
    /// Backing store failure
    Storage(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "{msg}"),
            ApiError::BadRequest(msg) => write!(f, "Invalid request: {msg}"),
            ApiError::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Storage(err) => error!(error = %err, "Request failed"),
            other => warn!(status = %status, error = %other, "Request rejected"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
