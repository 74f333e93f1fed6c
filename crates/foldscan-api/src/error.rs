//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors returned to API clients as `{error, message}` JSON bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body had no `url` field.
    #[error("Request body must include a \"url\" field")]
    MissingUrl,

    /// The provided URL did not parse.
    #[error("The provided URL is not valid")]
    InvalidUrl,

    /// Client is inside its cooldown window.
    #[error("Please wait {0} seconds before making another request")]
    RateLimited(u64),

    /// The scan itself failed.
    #[error("{0}")]
    ScanFailed(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ScanFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::MissingUrl => "Missing URL",
            ApiError::InvalidUrl => "Invalid URL",
            ApiError::RateLimited(_) => "Rate limit exceeded",
            ApiError::ScanFailed(_) => "Scan failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.title(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
