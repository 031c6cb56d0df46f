use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::fields::FieldError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::warn;

/// Handler error. Anything that is neither a conflict nor a missing row is
/// reported as a bad request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("{field} is required"))
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::Conflict(m) => ApiError::Conflict(m),
            ServiceError::Validation(m) => ApiError::BadRequest(m),
            ServiceError::Db(m) => {
                warn!(error = %m, "store failure");
                ApiError::BadRequest(m)
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
