//! Middleware and extractors for request processing

pub mod auth;
pub mod logging;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Error body returned by the relay: `{ "error": "<message>" }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Error message
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    /// Create an error answered with `status`
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
        }
    }

    /// 400 for a malformed request
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 401 for a rejected credential exchange
    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    /// 500 for anything that went wrong relaying the request
    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// Status the error is answered with
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
