//! HTTP error handling for the task API
//!
//! Maps the record store's error taxonomy onto consistent JSON error
//! responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use taskdeck_core::TaskServiceError;

/// JSON error response body
///
/// Validation and not-found failures carry a specific message; table
/// failures carry a generic message with diagnostic detail in `details`.
/// Connection internals and credentials never appear in either field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for operators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "TASK_NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<TaskServiceError> for HttpError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(message) => HttpError::new(message, "VALIDATION_ERROR"),
            TaskServiceError::NotFound { id } => {
                HttpError::new(format!("Task not found: {}", id), "TASK_NOT_FOUND")
            }
            TaskServiceError::Table(table_err) => HttpError::with_details(
                "Task table operation failed",
                "TABLE_ERROR",
                table_err.to_string(),
            ),
        }
    }
}
