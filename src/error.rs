//! Error types for chains and tables.

use core::fmt;

/// Failure of a single-chain operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    /// The chain is empty or holds no entry with the requested key.
    NotFound,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::NotFound => f.write_str("entry not found in chain"),
        }
    }
}

impl std::error::Error for ChainError {}

/// Failure of a table lookup or removal.
///
/// Absence is an ordinary negative result: callers probing for a key
/// should prefer `HashTable::contains` over matching on this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    KeyNotFound,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::KeyNotFound => f.write_str("key not found"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<ChainError> for TableError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NotFound => TableError::KeyNotFound,
        }
    }
}

/// Result type for table operations.
pub type Result<T> = core::result::Result<T, TableError>;
