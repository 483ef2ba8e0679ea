//! Database-specific error types and conversions.

use dirgate_core::error::DirgateError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    /// A multi-statement transaction was cancelled.
    #[error("Transaction cancelled: {0}")]
    Transaction(String),
}

impl From<DbError> for DirgateError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DirgateError::NotFound { entity, id },
            DbError::Transaction(reason) => DirgateError::AssignmentTransaction(reason),
            other => DirgateError::Database(other.to_string()),
        }
    }
}
