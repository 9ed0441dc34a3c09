use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;

use cattlecheck::CoordinationError;

/// Error response: `{"success": false, "message": ...}` with a matching status code
#[derive(Debug, Clone, PartialEq)]
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
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "message": self.message })),
        )
            .into_response()
    }
}

impl From<CoordinationError> for ApiError {
    fn from(e: CoordinationError) -> Self {
        let status = match e {
            CoordinationError::InvalidInput(_)
            | CoordinationError::NameRequired
            | CoordinationError::VerificationFailed => StatusCode::BAD_REQUEST,
            CoordinationError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CoordinationError::Forbidden => StatusCode::FORBIDDEN,
            CoordinationError::NotFound(_) => StatusCode::NOT_FOUND,
            CoordinationError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            CoordinationError::PredictionFailed => StatusCode::BAD_GATEWAY,
            CoordinationError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, ApiError>;
}

impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, ApiError> {
        self.map_err(ApiError::from)
    }
}
