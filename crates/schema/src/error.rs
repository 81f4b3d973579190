//! Error types for the schema layer
//!
//! Absence is not an error here: a missing table or column is reported as
//! `false`/`None`/empty by the inspector and runner. These variants cover
//! the failures that do surface — connectivity, bad SQL, failed DDL.

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error types for schema and migration operations
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// Database driver or query error
    #[error("Database error: {0}")]
    Database(String),
    /// Connection-level error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Declared schema is unusable
    #[error("Schema error: {0}")]
    Schema(String),
    /// A migration statement failed to apply
    #[error("Migration error: {0}")]
    Migration(String),
}

// Convert from sqlx errors
impl From<sqlx::Error> for SchemaError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                SchemaError::Connection(err.to_string())
            }
            _ => SchemaError::Database(err.to_string()),
        }
    }
}
