use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::mail::MailError;
use crate::storage::StorageError;

pub const RESUME_REQUIRED_MESSAGE: &str = "Resume file is required.";
pub const FIELDS_REQUIRED_MESSAGE: &str = "All fields are required, including the resume file.";
pub const UPLOAD_ERROR_MESSAGE: &str = "File upload error. Please check the file and try again.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Which input check rejected the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    ResumeRequired,
    FieldsRequired,
}

impl ValidationFailure {
    pub fn message(self) -> &'static str {
        match self {
            ValidationFailure::ResumeRequired => RESUME_REQUIRED_MESSAGE,
            ValidationFailure::FieldsRequired => FIELDS_REQUIRED_MESSAGE,
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant is logged before the response is built; clients only see the
/// fixed message for its category.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(ValidationFailure),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooLarge { .. } | StorageError::InvalidName(_) => {
                AppError::Upload(err.to_string())
            }
            StorageError::Io(e) => AppError::Io(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(failure) => {
                tracing::warn!("Rejected application: {}", failure.message());
                (StatusCode::BAD_REQUEST, failure.message())
            }
            AppError::Upload(detail) => {
                tracing::warn!("Upload error: {detail}");
                (StatusCode::BAD_REQUEST, UPLOAD_ERROR_MESSAGE)
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            AppError::Io(e) => {
                tracing::error!("Storage error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_messages_are_distinct() {
        let (status, body) = render(AppError::Validation(ValidationFailure::ResumeRequired)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], RESUME_REQUIRED_MESSAGE);

        let (status, body) = render(AppError::Validation(ValidationFailure::FieldsRequired)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], FIELDS_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_too_large_maps_to_upload_error() {
        let err: AppError = StorageError::TooLarge { limit: 10 }.into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], UPLOAD_ERROR_MESSAGE);

        let err: AppError = StorageError::InvalidName("..".into()).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], UPLOAD_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_failures_hide_detail() {
        let (status, body) = render(AppError::Mail(MailError::Smtp("535 auth failed".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": INTERNAL_ERROR_MESSAGE }));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = StorageError::Io(io).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
