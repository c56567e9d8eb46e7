use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::services::{ReportError, UploadError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP projection of the service error taxonomy. Provider detail is logged
/// at conversion time; clients only ever see a generic 500 message.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        let message = e.to_string();
        match e {
            UploadError::Policy(_)
            | UploadError::NoUploadPending(_)
            | UploadError::NoAudioFile(_) => ApiError::BadRequest(message),
            UploadError::EvaluationNotFound(_) | UploadError::ObjectMissing(_) => {
                ApiError::NotFound(message)
            }
            UploadError::UploadInFlight(_)
            | UploadError::AlreadyConfirmed(_)
            | UploadError::FileNameMismatch { .. }
            | UploadError::AlreadyTreated(_)
            | UploadError::UploadNotConfirmed(_) => ApiError::Conflict(message),
            UploadError::Store(_) | UploadError::Queue(_) | UploadError::Repository(_) => {
                tracing::error!(error = %message, "Upload operation failed");
                ApiError::Internal
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        let message = e.to_string();
        match e {
            ReportError::EvaluationNotFound(_) | ReportError::ResultNotReady(_) => {
                ApiError::NotFound(message)
            }
            ReportError::Repository(_) => {
                tracing::error!(error = %message, "Report query failed");
                ApiError::Internal
            }
        }
    }
}
