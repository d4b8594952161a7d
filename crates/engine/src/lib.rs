//! Table engine for jadb
//!
//! This crate orchestrates all lower layers:
//! - Database: table lifecycle, locked mutations and reads
//! - Query engine: predicate evaluation, logical combination, filter/order/limit
//! - Relation maintenance: unset or cascade dependent records after deletes
//! - Configuration (`jadb.toml`) and log setup
//!
//! The engine is the only component that knows about:
//! - Lock windows spanning load through save
//! - Cross-table relation maintenance

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod logging;
pub mod query;
pub mod relations;

pub use database::{Database, JadbConfig, CONFIG_FILE_NAME};
pub use logging::init_logging;
pub use relations::{RelationOutcome, RelationReport};

pub use jadb_concurrency::{LockPolicy, TableLockGuard, TableLockManager};
pub use jadb_core::{
    parse_relation_value, relation_value, timestamp, Condition, Connector, Direction, Error,
    Limit, Operator, OrderKey, OrderSpec, Predicate, Query, Record, Relation, RelationMode,
    Result, StorageError, TableDocument, TableStorage, Value, WhereClause, CREATED_FIELD,
    ID_FIELD, MODIFIED_FIELD,
};
pub use jadb_storage::{FileStorage, MemoryStorage};
