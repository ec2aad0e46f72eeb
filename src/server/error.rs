use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::Error;

/// Error returned by route handlers, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be decoded.
    Rejected(String),
    Service(Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(Error::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Service(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::Service(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Rejected(detail) => detail.clone(),
            ApiError::Service(e) => e.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %detail, "request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
