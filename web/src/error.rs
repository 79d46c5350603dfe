//! Error types for web handlers.
//!
//! [`AppError`] bridges store errors and HTTP responses by implementing
//! Axum's `IntoResponse`. Server errors are logged with their source; the
//! client only sees the code and message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rsvp_core::{Field, StoreError, ValidationError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Vec<RsvpRecord>>, AppError> {
///     let records = state.store.list().await?;
///     Ok(Json(records))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Submission field the error refers to, if any
    field: Option<Field>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            field: None,
            source: None,
        }
    }

    /// Attach the error that caused this one.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Point the error at a submission field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 400 validation error naming the rejected field.
    #[must_use]
    pub fn validation(err: ValidationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            err.message,
            "VALIDATION_ERROR".to_string(),
        )
        .with_field(err.field)
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Field the error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<Field> {
        self.field
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Rejected submission field.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<Field>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            field: self.field,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => Self::validation(err),
            StoreError::Storage(err) => {
                Self::internal("Failed to access RSVP storage").with_source(err.into())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use rsvp_core::StorageError;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation_carries_field() {
        let err = AppError::from(StoreError::Validation(
            rsvp_core::RsvpSubmission::default().validate().unwrap_err(),
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.field(), Some(Field::Name));
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = AppError::from(StoreError::Storage(StorageError::Io(
            "disk full".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_body_omits_missing_field() {
        let body = ErrorResponse {
            code: "BAD_REQUEST".to_string(),
            message: "Expected a JSON object".to_string(),
            field: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"code": "BAD_REQUEST", "message": "Expected a JSON object"}));
    }
}
