use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::fields::FieldError;
use thiserror::Error;
use tracing::warn;

use crate::io_client::IoError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    /// Status returned by io-service, passed through unchanged.
    #[error("io-service responded with {0}")]
    Upstream(StatusCode),
    #[error("io-service unavailable: {0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(s) => *s,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<IoError> for ApiError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Status(s) => ApiError::Upstream(s),
            IoError::Transport(m) | IoError::Decode(m) => {
                warn!(error = %m, "io-service call failed");
                ApiError::BadGateway(m)
            }
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(e: FieldError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
