//! Fault injection for storage failure-path tests
//!
//! [`FaultyStorage`] wraps any backend and fails selected operations on
//! selected tables until the fault is cleared.
//!
//! # Example
//!
//! ```
//! use jadb_storage::testing::{Fault, FaultyStorage};
//! use jadb_storage::MemoryStorage;
//!
//! let storage = FaultyStorage::new(MemoryStorage::new());
//! storage.inject("orders", Fault::Save);
//! ```

use jadb_core::error::StorageError;
use jadb_core::record::TableDocument;
use jadb_core::traits::TableStorage;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Storage operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// `load` fails
    Load,
    /// `save` fails
    Save,
    /// `remove` fails
    Remove,
}

/// Backend wrapper that fails injected operations
#[derive(Debug)]
pub struct FaultyStorage<S> {
    inner: S,
    faults: Mutex<HashSet<(String, Fault)>>,
    saves: AtomicUsize,
}

impl<S: TableStorage> FaultyStorage<S> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: S) -> Self {
        FaultyStorage {
            inner,
            faults: Mutex::new(HashSet::new()),
            saves: AtomicUsize::new(0),
        }
    }

    /// Make `fault` fail for `table` until cleared
    pub fn inject(&self, table: &str, fault: Fault) {
        self.faults.lock().insert((table.to_string(), fault));
    }

    /// Disarm every fault
    pub fn clear(&self) {
        self.faults.lock().clear();
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The wrapped backend
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, table: &str, fault: Fault) -> Result<(), StorageError> {
        if self.faults.lock().contains(&(table.to_string(), fault)) {
            return Err(StorageError::Injected(format!("{:?} on {}", fault, table)));
        }
        Ok(())
    }
}

impl<S: TableStorage> TableStorage for FaultyStorage<S> {
    fn exists(&self, table: &str) -> Result<bool, StorageError> {
        self.inner.exists(table)
    }

    fn load(&self, table: &str) -> Result<TableDocument, StorageError> {
        self.check(table, Fault::Load)?;
        self.inner.load(table)
    }

    fn save(&self, table: &str, document: &TableDocument) -> Result<(), StorageError> {
        self.check(table, Fault::Save)?;
        self.inner.save(table, document)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, table: &str) -> Result<(), StorageError> {
        self.check(table, Fault::Remove)?;
        self.inner.remove(table)
    }
}
