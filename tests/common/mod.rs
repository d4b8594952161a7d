//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use jadb::{Database, JadbConfig, Query, Record, Relation, Value, WhereClause};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// TestDb - file-backed database in a temp directory
// ============================================================================

/// File-backed database that lives as long as its temp directory.
pub struct TestDb {
    pub db: Database,
    pub dir: TempDir,
}

impl TestDb {
    /// Fresh database with fast lock polling.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&fast_config(dir.path())).expect("open database");
        TestDb { db, dir }
    }

    /// Data directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a second handle on the same directory.
    pub fn reopen(&self) -> Database {
        Database::open(&fast_config(self.dir.path())).expect("reopen database")
    }

    /// Create `table` and insert `rows` (a JSON array of objects).
    pub fn seed(&self, table: &str, rows: serde_json::Value) -> Vec<Record> {
        self.db.create(table, true).expect("create table");
        self.db.insert(table, records(rows)).expect("insert rows")
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Config rooted at `dir` with a 1ms retry delay.
pub fn fast_config(dir: &Path) -> JadbConfig {
    let mut config = JadbConfig::with_dir(dir);
    config.lock_retry_delay_ms = 1;
    config.lock_timeout_ms = Duration::from_secs(10).as_millis() as u64;
    config
}

/// Records from a JSON array of objects.
pub fn records(rows: serde_json::Value) -> Vec<Record> {
    serde_json::from_value(rows).expect("array of objects")
}

/// Where-clause from its JSON form.
pub fn clause(json: serde_json::Value) -> WhereClause {
    serde_json::from_value(json).expect("where-clause")
}

/// Select with a where-clause given as JSON.
pub fn select_where(db: &Database, table: &str, json: serde_json::Value) -> Vec<Record> {
    db.select(table, &Query::new().filter(clause(json)))
        .expect("select")
}

/// Identifiers of `records`, in order.
pub fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().filter_map(Record::id).collect()
}
