//! Per-table exclusive locks for read-modify-write cycles
//!
//! A table is either checked out (locked) or free. Acquisition does not queue:
//! a caller that finds the table checked out sleeps for the policy's retry
//! delay and polls again, until it wins or the policy's timeout elapses.
//! There is no fairness between waiters.
//!
//! ## Release Guarantees
//!
//! [`TableLockManager::acquire`] returns a [`TableLockGuard`] that releases the
//! table when dropped, so every exit path of a locked operation (success,
//! error, panic) frees the table. [`TableLockManager::release`] force-releases
//! a table regardless of holder; each acquisition carries a generation token,
//! so a guard never frees a newer holder's lock after a forced release.

use jadb_core::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default delay between lock polls
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(50);
/// Default time a caller waits for a contended table before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Polling behaviour for contended tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Sleep between polls
    pub retry_delay: Duration,
    /// Give up after this long; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for LockPolicy {
    fn default() -> Self {
        LockPolicy {
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: Some(DEFAULT_LOCK_TIMEOUT),
        }
    }
}

impl LockPolicy {
    /// Policy with the given retry delay and timeout
    pub fn new(retry_delay: Duration, timeout: Option<Duration>) -> Self {
        LockPolicy {
            retry_delay,
            timeout,
        }
    }
}

#[derive(Debug, Default)]
struct LockTable {
    held: HashMap<String, u64>,
    next_generation: u64,
}

/// Set of tables currently checked out for exclusive read-modify-write
#[derive(Debug, Default)]
pub struct TableLockManager {
    state: Mutex<LockTable>,
    policy: LockPolicy,
}

impl TableLockManager {
    /// Create a manager with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with a custom policy
    pub fn with_policy(policy: LockPolicy) -> Self {
        TableLockManager {
            state: Mutex::new(LockTable::default()),
            policy,
        }
    }

    /// Polling policy in effect
    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    /// Check out `table` if it is free
    pub fn try_acquire(&self, table: &str) -> Option<TableLockGuard<'_>> {
        let mut state = self.state.lock();
        if state.held.contains_key(table) {
            return None;
        }
        state.next_generation += 1;
        let generation = state.next_generation;
        state.held.insert(table.to_string(), generation);
        debug!(target: "jadb::lock", table, "Locking");
        Some(TableLockGuard {
            manager: self,
            table: table.to_string(),
            generation,
        })
    }

    /// Check out `table`, polling while another holder has it
    ///
    /// # Errors
    ///
    /// Returns `Error::LockTimeout` if the table stays checked out past the
    /// policy's timeout.
    pub fn acquire(&self, table: &str) -> Result<TableLockGuard<'_>> {
        let started = Instant::now();
        loop {
            if let Some(guard) = self.try_acquire(table) {
                return Ok(guard);
            }
            self.back_off(table, started)?;
        }
    }

    /// Wait until `table` is not checked out, without taking it
    ///
    /// Used by read-only operations so they do not read a document that a
    /// writer is about to replace.
    ///
    /// # Errors
    ///
    /// Returns `Error::LockTimeout` under the same policy as [`acquire`](Self::acquire).
    pub fn wait_unlocked(&self, table: &str) -> Result<()> {
        let started = Instant::now();
        while self.is_locked(table) {
            self.back_off(table, started)?;
        }
        Ok(())
    }

    fn back_off(&self, table: &str, started: Instant) -> Result<()> {
        let waited = started.elapsed();
        if let Some(timeout) = self.policy.timeout {
            if waited >= timeout {
                return Err(Error::LockTimeout {
                    table: table.to_string(),
                    waited,
                });
            }
        }
        debug!(
            target: "jadb::lock",
            table,
            delay_ms = self.policy.retry_delay.as_millis() as u64,
            "Table locked, retrying"
        );
        thread::sleep(self.policy.retry_delay);
        Ok(())
    }

    /// Force-release `table`; releasing a free table is a no-op
    pub fn release(&self, table: &str) {
        if self.state.lock().held.remove(table).is_some() {
            debug!(target: "jadb::lock", table, "Unlocking");
        }
    }

    /// Check if `table` is checked out
    pub fn is_locked(&self, table: &str) -> bool {
        self.state.lock().held.contains_key(table)
    }

    /// Tables currently checked out, sorted
    pub fn locked_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.state.lock().held.keys().cloned().collect();
        tables.sort();
        tables
    }

    fn release_generation(&self, table: &str, generation: u64) {
        let mut state = self.state.lock();
        if state.held.get(table) == Some(&generation) {
            state.held.remove(table);
            debug!(target: "jadb::lock", table, "Unlocking");
        }
    }
}

/// Exclusive hold on one table; released on drop
#[derive(Debug)]
#[must_use = "the table is released as soon as the guard is dropped"]
pub struct TableLockGuard<'a> {
    manager: &'a TableLockManager,
    table: String,
    generation: u64,
}

impl TableLockGuard<'_> {
    /// Locked table
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Drop for TableLockGuard<'_> {
    fn drop(&mut self) {
        self.manager.release_generation(&self.table, self.generation);
    }
}
