use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again later.";

/// Errors as the client sees them: a status code and a list of messages.
/// Internals are logged where the error is produced and never included.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {}", .0.join(" "))]
    BadRequest(Vec<String>),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}

impl AppError {
    pub fn unexpected() -> Self {
        AppError::Internal(UNEXPECTED_ERROR.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::BadRequest(errors) => (StatusCode::BAD_REQUEST, errors),
            AppError::Upstream(message) => (StatusCode::BAD_GATEWAY, vec![message]),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, vec![message]),
        };

        (status, Json(ErrorBody { errors })).into_response()
    }
}
