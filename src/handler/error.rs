use crate::error::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validation errors echo their message; anything else is logged and
/// answered with a generic 500.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::InvalidArgument(message) => {
                warn!(%message, "Rejected invalid request");
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            other => {
                error!(error = %other, "Unhandled error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}
