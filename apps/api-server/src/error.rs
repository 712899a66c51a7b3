//! Server error types.

use api_protocol::{ErrorResponse, ValidationError};
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entities::{Mode, Priority};
use task_store::{Constraint, TaskStoreError};

/// Message sent to clients for any failure that is not their fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage error.
    #[error("Store error: {0}")]
    Store(#[from] TaskStoreError),

    /// Internal server error. The message is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

/// Maps a storage error to the status and message a client sees.
///
/// Constraint violations are the client's fault and name the rule that was
/// broken; anything unrecognized becomes a generic 500.
pub fn store_error_response(err: &TaskStoreError) -> (StatusCode, String) {
    match err {
        TaskStoreError::CheckViolation {
            constraint: Constraint::TaskMode,
        } => (
            StatusCode::BAD_REQUEST,
            format!("mode must be one of: {}", Mode::allowed_values()),
        ),
        TaskStoreError::CheckViolation {
            constraint: Constraint::TaskPriority,
        } => (
            StatusCode::BAD_REQUEST,
            format!("priority must be one of: {}", Priority::allowed_values()),
        ),
        TaskStoreError::CheckViolation { .. } => {
            (StatusCode::BAD_REQUEST, "Check input values".to_string())
        }
        TaskStoreError::ForeignKeyViolation { .. } => (
            StatusCode::BAD_REQUEST,
            "Device with given id was not found".to_string(),
        ),
        TaskStoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        TaskStoreError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR_MESSAGE.to_string(),
        ),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Store(e) => store_error_response(e),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_violation_messages() {
        let (status, message) =
            store_error_response(&TaskStoreError::check_violation(Constraint::TaskMode));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "mode must be one of: open, done");

        let (status, message) =
            store_error_response(&TaskStoreError::check_violation(Constraint::TaskPriority));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "priority must be one of: critical, important, slight");

        let (status, message) = store_error_response(&TaskStoreError::check_violation(
            Constraint::Other("task_description_check".to_string()),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Check input values");
    }

    #[test]
    fn test_foreign_key_violation_message() {
        let (status, message) = store_error_response(&TaskStoreError::foreign_key_violation(
            Constraint::TaskDevice,
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Device with given id was not found");
    }

    #[test]
    fn test_unmapped_errors_are_generic() {
        let (status, message) =
            store_error_response(&TaskStoreError::Database(sqlx_pool_timeout()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_passes_message() {
        let (status, message) = store_error_response(&TaskStoreError::not_found("Task", "8"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Task with given id (8) was not found");
    }

    #[tokio::test]
    async fn test_internal_error_body_does_not_leak() {
        let response = ServerError::Internal("password=hunter2".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }

    fn sqlx_pool_timeout() -> task_store::sqlx::Error {
        task_store::sqlx::Error::PoolTimedOut
    }
}
