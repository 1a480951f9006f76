//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping construction and manual overrides.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A header repeats a column name.
    #[error("duplicate column name: {column}")]
    DuplicateColumn { column: String },
    /// A manual override names a source column absent from the source header.
    #[error("source column not found: {column}")]
    UnresolvedReference { column: String },
    /// A manual override names a column that is not in the target header.
    #[error("target column not found: {column}")]
    UnknownTarget { column: String },
    /// A stored entry's status disagrees with its chosen source column.
    #[error("inconsistent mapping entry for target column: {column}")]
    InconsistentEntry { column: String },
}

pub type Result<T> = std::result::Result<T, MappingError>;
