use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roundabout_core::RingError;
use serde_json::json;
use tracing::{error, info, warn};

pub type Result<T> = std::result::Result<T, AppError>;

/// A ring error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct AppError(pub RingError);

impl From<RingError> for AppError {
    fn from(value: RingError) -> Self {
        Self(value)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RingError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RingError::DuplicateShortcode(_)
            | RingError::AlreadyFirst(_)
            | RingError::AlreadyLast(_) => StatusCode::CONFLICT,
            RingError::NotFound(_) | RingError::EmptyRing => StatusCode::NOT_FOUND,
            RingError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            RingError::InconsistentState(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            RingError::Storage(_) => warn!(error = %self.0, "storage failure"),
            RingError::InconsistentState(_) => error!(error = %self.0, "inconsistent ring"),
            _ => info!(error = %self.0, status = status.as_u16(), "request rejected"),
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
