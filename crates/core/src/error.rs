//! Error types for jadb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! | Category | Variants |
//! |----------|----------|
//! | Table state | `AlreadyExists` |
//! | Storage | `Storage` (wraps [`StorageError`] plus the table name) |
//! | Validation | `Validation` |
//! | Concurrency | `LockTimeout` |
//! | Context | `Operation` (operation name, table and arguments around a cause) |
//! | System | `Internal` |

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for jadb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a [`TableStorage`](crate::traits::TableStorage) backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing resource for the table does not exist
    #[error("table not found")]
    NotFound,

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The table name cannot be mapped onto the backend
    #[error("invalid table name: {0}")]
    InvalidName(String),

    /// Failure injected by a test harness
    #[error("injected failure: {0}")]
    Injected(String),
}

/// Error types for the jadb table service
#[derive(Debug, Error)]
pub enum Error {
    /// Table creation with `must_not_exist` found an existing table
    #[error("Table {table} already exists.")]
    AlreadyExists {
        /// Table name
        table: String,
    },

    /// Storage collaborator failed to load, save or remove a table
    #[error("Storage error on table {table}: {source}")]
    Storage {
        /// Table name
        table: String,
        /// Underlying backend error
        #[source]
        source: StorageError,
    },

    /// Malformed input or configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// The table stayed checked out longer than the lock policy allows
    #[error("Timed out after {waited:?} waiting for lock on table {table}")]
    LockTimeout {
        /// Table name
        table: String,
        /// How long the caller polled before giving up
        waited: Duration,
    },

    /// A table operation failed; carries the arguments it was called with
    #[error("{operation} ({table}, {context}) failed: {source}")]
    Operation {
        /// Operation name (e.g. "Update")
        operation: &'static str,
        /// Table name
        table: String,
        /// Arguments of the failed call, rendered as JSON
        context: String,
        /// The error that made the operation fail
        #[source]
        source: Box<Error>,
    },

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a storage error for `table`
    pub fn storage(table: impl Into<String>, source: StorageError) -> Self {
        Error::Storage {
            table: table.into(),
            source,
        }
    }

    /// Wrap this error with the operation that failed
    pub fn in_operation(
        self,
        operation: &'static str,
        table: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Error::Operation {
            operation,
            table: table.into(),
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `Operation` context layers
    pub fn root(&self) -> &Error {
        match self {
            Error::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if the root cause is a missing table
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Error::Storage {
                source: StorageError::NotFound,
                ..
            }
        )
    }
}
