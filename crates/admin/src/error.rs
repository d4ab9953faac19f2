//! Unified error handling for admin.
//!
//! Every handler error is rendered as the same JSON envelope:
//!
//! ```json
//! {
//!   "timestamp": "2024-03-01T10:15:00Z",
//!   "error": "Validation failed",
//!   "message": "One or more fields have validation errors",
//!   "status": 400,
//!   "details": { "name": "must be between 2 and 100 characters" }
//! }
//! ```

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bacoge_core::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::address::AddressError;
use crate::services::ServiceError;

/// Field name → message.
pub type ErrorDetails = BTreeMap<String, String>;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed field validation.
    #[error("validation failed: {0:?}")]
    Validation(ErrorDetails),

    /// Query or path parameter missing or of the wrong type.
    #[error("invalid request parameter: {0}")]
    RequestParameter(String),

    /// A parameter or value broke a declared constraint.
    #[error("constraint violation: {0:?}")]
    ConstraintViolation(ErrorDetails),

    /// The multipart body could not be read.
    #[error("invalid multipart request: {0}")]
    Multipart(String),

    /// Caller passed an argument the operation cannot accept.
    #[error("{0}")]
    IllegalArgument(String),

    /// A database constraint rejected the write.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// JSON body could not be parsed.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

/// The JSON body sent for every error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub error: String,
    pub message: String,
    pub status: u16,
    pub details: Option<ErrorDetails>,
}

impl AppError {
    /// Single-entry constraint violation.
    #[must_use]
    pub fn constraint(field: &str, message: impl Into<String>) -> Self {
        Self::ConstraintViolation(BTreeMap::from([(field.to_string(), message.into())]))
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::RequestParameter(_)
            | Self::ConstraintViolation(_)
            | Self::Multipart(_)
            | Self::IllegalArgument(_)
            | Self::DataIntegrity(_)
            | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the envelope for this error.
    #[must_use]
    pub fn to_response_body(&self) -> ErrorResponse {
        let (error, message, details) = match self {
            Self::Validation(fields) | Self::ConstraintViolation(fields) => (
                "Validation failed",
                "One or more fields have validation errors".to_string(),
                Some(fields.clone()),
            ),
            Self::RequestParameter(cause) => (
                "Bad Request",
                "Invalid or missing request parameter".to_string(),
                Some(detail("parameter", cause)),
            ),
            Self::Multipart(cause) => (
                "Bad Request",
                "Invalid multipart/form-data".to_string(),
                Some(detail("multipart", cause)),
            ),
            Self::IllegalArgument(msg) => ("Bad Request", msg.clone(), Some(detail("argument", msg))),
            Self::DataIntegrity(cause) => (
                "Bad Request",
                "Violation d'intégrité des données".to_string(),
                Some(detail("integrity", cause)),
            ),
            Self::MalformedBody(cause) => (
                "Bad Request",
                "Malformed request body".to_string(),
                Some(detail("body", cause)),
            ),
            Self::NotFound(msg) => ("Not Found", msg.clone(), None),
            Self::Unauthorized(msg) => ("Unauthorized", msg.clone(), None),
            Self::Forbidden(msg) => ("Forbidden", msg.clone(), None),
            Self::Internal(msg) => ("Internal Server Error", msg.clone(), None),
        };

        ErrorResponse {
            timestamp: Utc::now(),
            error: error.to_string(),
            message,
            status: self.status().as_u16(),
            details,
        }
    }
}

fn detail(key: &str, value: &str) -> ErrorDetails {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::debug!(error = %self, "Admin request rejected");
        }

        (self.status(), Json(self.to_response_body())).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Resource not found".to_string()),
            RepositoryError::Conflict(cause) => Self::DataIntegrity(cause),
            RepositoryError::Address(inner) => inner.into(),
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<AddressError> for AppError {
    fn from(err: AddressError) -> Self {
        Self::IllegalArgument(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(inner) => inner.into(),
            ServiceError::InvalidArgument(msg) => Self::IllegalArgument(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "Invalid value".to_string());
                (field.to_string(), message)
            })
            .collect();
        Self::Validation(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::RequestParameter(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::RequestParameter(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err.body_text())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

/// Set the Sentry user context for the logged-in admin.
pub fn set_sentry_user(user_id: UserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body(err: &AppError) -> serde_json::Value {
        serde_json::to_value(err.to_response_body()).unwrap()
    }

    #[test]
    fn test_validation_envelope() {
        let err = AppError::Validation(BTreeMap::from([(
            "name".to_string(),
            "Category name is required".to_string(),
        )]));
        let json = body(&err);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], 400);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["message"], "One or more fields have validation errors");
        assert_eq!(json["details"]["name"], "Category name is required");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_request_parameter_envelope() {
        let json = body(&AppError::RequestParameter("days: invalid digit".to_string()));
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "Invalid or missing request parameter");
        assert_eq!(json["details"]["parameter"], "days: invalid digit");
    }

    #[test]
    fn test_constraint_violation_uses_validation_labels() {
        let err = AppError::constraint("days", "must be between 1 and 365");
        let json = body(&err);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"]["days"], "must be between 1 and 365");
    }

    #[test]
    fn test_multipart_envelope() {
        let json = body(&AppError::Multipart("missing boundary".to_string()));
        assert_eq!(json["message"], "Invalid multipart/form-data");
        assert_eq!(json["details"]["multipart"], "missing boundary");
    }

    #[test]
    fn test_illegal_argument_echoes_message() {
        let json = body(&AppError::IllegalArgument("end must not precede start".to_string()));
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "end must not precede start");
        assert_eq!(json["details"]["argument"], "end must not precede start");
    }

    #[test]
    fn test_data_integrity_envelope() {
        let json = body(&AppError::DataIntegrity(
            "duplicate key value violates unique constraint \"categories_name_key\"".to_string(),
        ));
        assert_eq!(json["message"], "Violation d'intégrité des données");
        assert!(
            json["details"]["integrity"]
                .as_str()
                .unwrap()
                .contains("categories_name_key")
        );
    }

    #[test]
    fn test_internal_error_has_null_details() {
        let err = AppError::Internal("boom".to_string());
        let json = body(&err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], 500);
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "boom");
        assert!(json["details"].is_null());
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::MalformedBody("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_repository_conflict_becomes_data_integrity() {
        let err: AppError = RepositoryError::Conflict("fk violation".to_string()).into();
        assert!(matches!(err, AppError::DataIntegrity(ref c) if c == "fk violation"));

        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_address_error_is_illegal_argument() {
        let err: AppError = AddressError::MissingName.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&err)["details"]["argument"], AddressError::MissingName.to_string());
    }
}
