//! Concurrency layer for jadb
//!
//! This crate serializes read-modify-write access to tables:
//! - TableLockManager: per-table exclusive checkout with poll-and-retry
//! - LockPolicy: retry delay and timeout for contended tables
//! - TableLockGuard: RAII release on every exit path
//! - shared_lock_manager: one manager per data directory, process-wide
//!
//! Locks are per table name; operations on different tables never contend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lock;
pub mod registry;

pub use lock::{
    LockPolicy, TableLockGuard, TableLockManager, DEFAULT_LOCK_TIMEOUT, DEFAULT_RETRY_DELAY,
};
pub use registry::shared_lock_manager;
