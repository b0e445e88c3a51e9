//! # Error Types
//!
//! Input validation errors for klinika-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a user-facing message
//!
//! Failures that can only be observed against stored state (missing
//! foreign keys, insufficient stock, duplicate business codes) live in
//! the database layer, which is where they are detected.

use thiserror::Error;

/// Input validation errors.
///
/// These occur when a request payload does not meet requirements,
/// before any business logic or storage access runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed email or amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must contain at least one element is empty.
    #[error("{field} must contain at least one entry")]
    EmptyCollection { field: String },
}

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "patient_code".to_string(),
        };
        assert_eq!(err.to_string(), "patient_code is required");

        let err = ValidationError::EmptyCollection {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one entry");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }
}
