//! Core types and traits for jadb
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum for record fields
//! - Record / TableDocument: stored entities and the persisted table state
//! - Query types: WhereClause, Condition, Operator, Connector, OrderSpec, Limit, Query
//! - Relation: descriptors and the `<table>~<id>` relation-value codec
//! - Error: Error type hierarchy
//! - Traits: TableStorage, the whole-document storage seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
pub mod record;
pub mod relation;
pub mod traits;
pub mod value;

pub use error::{Error, Result, StorageError};
pub use query::{
    Condition, Connector, Direction, Limit, Operator, OrderKey, OrderSpec, Predicate, Query,
    WhereClause,
};
pub use record::{
    timestamp, Record, TableDocument, CREATED_FIELD, ID_FIELD, MODIFIED_FIELD, RESERVED_FIELDS,
};
pub use relation::{parse_relation_value, relation_value, Relation, RelationMode, RELATION_SEPARATOR};
pub use traits::TableStorage;
pub use value::Value;
