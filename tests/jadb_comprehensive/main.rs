//! End-to-end tests through the `jadb` facade against file-backed tables.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod lifecycle;
mod persistence;
mod query_semantics;
mod relations;
