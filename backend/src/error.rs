use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::StorageError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Task not found")]
    NotFound,
    #[error("{reason}")]
    Demo { status: StatusCode, reason: String },
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

/// Malformed or incomplete JSON bodies surface as 400 with the usual envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Demo { status, .. } => *status,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let reason = match &self {
            ApiError::Storage(err) => {
                error!("Storage failure: {}", err);
                "Internal server error".to_string()
            }
            other => {
                warn!("Request rejected ({}): {}", status, other);
                other.to_string()
            }
        };

        (status, Json(ErrorResponse::new(reason))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_becomes_404() {
        let err: ApiError = StorageError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_become_500() {
        let err: ApiError = StorageError::Corrupt("bad id".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unsaved_task_is_a_server_error() {
        let err: ApiError = StorageError::Unsaved.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_become_400() {
        assert_eq!(
            ApiError::from(ValidationError::EmptyTitle).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("Invalid task id".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn demo_error_keeps_its_status() {
        let err = ApiError::Demo {
            status: StatusCode::IM_A_TEAPOT,
            reason: "teapot".to_string(),
        };
        assert_eq!(err.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(err.to_string(), "teapot");
    }
}
