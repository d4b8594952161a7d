//! jadb - embedded JSON table store
//!
//! Each table is one JSON document holding its records. jadb adds a small
//! query language (where-clauses, ordering, limits), per-table locking for
//! read-modify-write cycles and relation maintenance on delete.
//!
//! # Quick Start
//!
//! ```no_run
//! use jadb::{Condition, Database, JadbConfig, Query, Record, WhereClause};
//!
//! let db = Database::open(&JadbConfig::with_dir("data"))?;
//! db.create("colors", false)?;
//! db.insert("colors", vec![Record::new().with("color", "green")])?;
//!
//! let green = db.select(
//!     "colors",
//!     &Query::new().filter(WhereClause::from(Condition::equals("color", "green"))),
//! )?;
//! assert_eq!(green.len(), 1);
//! # Ok::<(), jadb::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `jadb-core`: values, records, query and relation types, errors
//! - `jadb-storage`: file and in-memory table backends
//! - `jadb-concurrency`: per-table locks
//! - `jadb-engine`: the table service, query engine and relation maintenance
//!
//! Everything callers need is re-exported from the engine.

pub use jadb_engine::*;
