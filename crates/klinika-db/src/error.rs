//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! SQLite error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module)  - adds context and categorization
//!      │
//!      ▼
//! ApiError (in server)   - serialized for the frontend
//! ```
//!
//! Domain failures that are only observable against stored state
//! (missing foreign keys, insufficient stock) are raised here too,
//! because they are detected inside the same transaction as the write
//! they guard.

use klinika_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate sale_number, patient_code,
    /// bill_number, username).
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Requested quantity exceeds available stock.
    ///
    /// Raised by the conditional stock decrement when zero rows match
    /// `stock_quantity >= requested`; the surrounding transaction rolls
    /// back, so no partial effects are ever visible.
    #[error("insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Input validation failure surfaced through the database layer.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit failed.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// All pooled connections are in use.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Anything else.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Maps sqlx errors onto the taxonomy above.
///
/// SQLite reports constraint failures as database errors with
/// recognizable message prefixes; everything else is passed through
/// with its category.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    // "UNIQUE constraint failed: sales.sale_number"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
