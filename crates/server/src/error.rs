//! Application error handling

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_core::ClinicError;
use serde::Serialize;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body rejected by an extractor, with the status it chose
    Rejected(StatusCode, String),
    Internal(String),
}

/// JSON body returned for failed requests
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Rejected(status, msg) => (status, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError::Internal(format!("Clinic store error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Rejected(err.status(), err.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Worker task failed: {}", err))
    }
}
