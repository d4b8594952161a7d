//! Process-wide lock manager registry
//!
//! Ensures every database opened on the same data directory shares one
//! [`TableLockManager`], so two handles on one directory serialize their
//! writes against each other. Uses weak references so managers are dropped
//! once no database uses them.
//!
//! Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
//! panics from mutex poisoning.

use crate::lock::{LockPolicy, TableLockManager};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Global registry of lock managers (canonical dir -> weak reference)
static SHARED_LOCKS: Lazy<Mutex<HashMap<PathBuf, Weak<TableLockManager>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Lock manager shared by every database on `dir`
///
/// The first caller's `policy` wins; later callers on the same directory get
/// the existing manager unchanged.
pub fn shared_lock_manager(dir: &Path, policy: LockPolicy) -> Arc<TableLockManager> {
    let key = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let mut registry = SHARED_LOCKS.lock();

    if let Some(existing) = registry.get(&key).and_then(Weak::upgrade) {
        debug!(target: "jadb::lock", dir = %key.display(), "Reusing shared lock manager");
        return existing;
    }

    registry.retain(|_, weak| weak.strong_count() > 0);
    let manager = Arc::new(TableLockManager::with_policy(policy));
    registry.insert(key, Arc::downgrade(&manager));
    manager
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_same_directory_shares_manager() {
        let dir = TempDir::new().unwrap();
        let a = shared_lock_manager(dir.path(), LockPolicy::default());
        let b = shared_lock_manager(dir.path(), LockPolicy::default());
        assert!(Arc::ptr_eq(&a, &b));

        let _guard = a.acquire("t").unwrap();
        assert!(b.is_locked("t"));
    }

    #[test]
    fn test_different_directories_are_independent() {
        let one = TempDir::new().unwrap();
        let two = TempDir::new().unwrap();
        let a = shared_lock_manager(one.path(), LockPolicy::default());
        let b = shared_lock_manager(two.path(), LockPolicy::default());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_manager_is_dropped_with_last_user() {
        let dir = TempDir::new().unwrap();
        let first = shared_lock_manager(dir.path(), LockPolicy::default());
        let weak = Arc::downgrade(&first);
        drop(first);
        assert!(weak.upgrade().is_none());

        let second = shared_lock_manager(dir.path(), LockPolicy::default());
        assert!(!second.is_locked("t"));
    }
}
