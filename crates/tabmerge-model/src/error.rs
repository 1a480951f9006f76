//! Error types for table construction.

use thiserror::Error;

/// Errors raised when building model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A header names the same column twice.
    #[error("duplicate column name: {column}")]
    DuplicateColumn { column: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
