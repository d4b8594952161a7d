//! In-memory table storage
//!
//! Documents are kept as encoded JSON so every load hands out a fresh copy,
//! the same whole-document semantics the file backend has.

use jadb_core::error::StorageError;
use jadb_core::record::TableDocument;
use jadb_core::traits::TableStorage;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Table storage held in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all stored tables, sorted
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl TableStorage for MemoryStorage {
    fn exists(&self, table: &str) -> Result<bool, StorageError> {
        Ok(self.tables.read().contains_key(table))
    }

    fn load(&self, table: &str) -> Result<TableDocument, StorageError> {
        let tables = self.tables.read();
        let bytes = tables.get(table).ok_or(StorageError::NotFound)?;
        Ok(serde_json::from_slice(bytes)?)
    }

    fn save(&self, table: &str, document: &TableDocument) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(document)?;
        self.tables.write().insert(table.to_string(), bytes);
        Ok(())
    }

    fn remove(&self, table: &str) -> Result<(), StorageError> {
        self.tables.write().remove(table);
        Ok(())
    }
}
