//! # API Error Type
//!
//! Unified error envelope for the RPC surface.
//!
//! ## Error Flow
//! ```text
//! handler
//!   │
//!   ├── DbError (klinika-db) ──► From<DbError> ──► ApiError
//!   │
//!   └── ApiError ──► IntoResponse ──► { "code": "...", "message": "..." }
//!                                     with a matching HTTP status
//! ```
//!
//! The frontend switches on `code`; `message` is for display.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use klinika_db::DbError;

/// API error returned from RPC handlers.
///
/// ## Serialization
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "insufficient stock for ..." }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable message for display.
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced entity does not exist (404).
    NotFound,

    /// Input validation failed (400).
    ValidationError,

    /// Requested quantity exceeds available stock (409).
    InsufficientStock,

    /// Unique constraint violation (409).
    Conflict,

    /// Database operation failed (500).
    DatabaseError,

    /// Anything else (500).
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),

            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),

            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }

            DbError::Validation(_) => ApiError::validation(err.to_string()),

            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "invalid reference")
            }

            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::PoolExhausted => {
                tracing::error!("Database unavailable: {}", err);
                ApiError::new(ErrorCode::DatabaseError, "database unavailable")
            }

            DbError::QueryFailed(e) | DbError::TransactionFailed(e) | DbError::Internal(e) => {
                // Log the real cause, return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use klinika_core::ValidationError;

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", 404).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::InsufficientStock {
            product_id: 1,
            name: "Face Mask".to_string(),
            available: 2,
            requested: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.message.contains("available 2"));

        let err: ApiError = DbError::Validation(ValidationError::EmptyCollection {
            field: "items".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("quantity must be positive");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be positive");
    }
}
