//! Error types for the dirgate system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirgateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Unknown role: {name}")]
    UnknownRole { name: String },

    #[error("Invalid host: {host}")]
    InvalidHost { host: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The atomic replace of roles and/or scopes was rolled back.
    #[error("Assignment transaction failed: {0}")]
    AssignmentTransaction(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DirgateResult<T> = Result<T, DirgateError>;
