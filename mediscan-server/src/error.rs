use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scan_service::ScanError;
use serde_json::json;

/// Error surfaced to HTTP clients. Outcome states (`NotFound`,
/// `PrescriptionBlocked`) are not errors and never reach this type; this
/// covers malformed requests and collaborator failures only.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ScanError> for ApiError {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::InvalidTransition { .. } => Self {
                status: StatusCode::CONFLICT,
                message: error.to_string(),
            },
            ScanError::Recognition(_) | ScanError::Network(_) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: error.to_string(),
            },
            other => Self::internal(other.to_string()),
        }
    }
}
