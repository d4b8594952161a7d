//! Core traits for table storage abstraction
//!
//! This module defines the TableStorage trait that lets the table service run
//! over files, memory or a fault-injecting wrapper without changes.

use crate::error::StorageError;
use crate::record::TableDocument;

/// Whole-document storage of tables
///
/// Implementations load and save complete documents; there are no partial
/// writes. A `save` replaces the previous document atomically from the
/// caller's point of view.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait TableStorage: Send + Sync {
    /// Check whether the table exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn exists(&self, table: &str) -> Result<bool, StorageError>;

    /// Load the complete document of a table
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the table does not exist, or a
    /// decoding/I/O error if the stored document is unreadable.
    fn load(&self, table: &str) -> Result<TableDocument, StorageError>;

    /// Replace the complete document of a table, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    fn save(&self, table: &str, document: &TableDocument) -> Result<(), StorageError>;

    /// Remove a table; removing a missing table succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to remove an existing table.
    fn remove(&self, table: &str) -> Result<(), StorageError>;
}
