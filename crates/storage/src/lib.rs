//! Storage layer for jadb
//!
//! This crate implements the whole-document table backends:
//! - FileStorage: one `<table>.json` file per table, atomic temp+rename writes
//! - MemoryStorage: encoded documents in a RwLock'd map (tests, ephemeral use)
//! - testing::FaultyStorage: fault injection wrapper for failure-path tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod memory;
pub mod testing;

pub use file::{validate_table_name, FileStorage};
pub use memory::MemoryStorage;
pub use testing::{Fault, FaultyStorage};
