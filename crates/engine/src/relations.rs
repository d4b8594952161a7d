//! Relation maintenance after deletes
//!
//! When records of an owning table are deleted, dependent tables that link to
//! them through `<table>~<id>` relation values are cleaned up in one of two
//! modes (see [`RelationMode`]):
//!
//! | Field shape | Unset | Cascade |
//! |-------------|-------|---------|
//! | array containing the value | value removed | value removed |
//! | array, empty after the pass | kept | record deleted |
//! | scalar equal to the value | field removed | record deleted |
//!
//! [`apply`] is a pure transformation of one loaded document; the table
//! service wraps it in a locked load-mutate-save cycle per relation.

use jadb_core::error::Result;
use jadb_core::record::{Record, TableDocument};
use jadb_core::relation::{Relation, RelationMode};
use jadb_core::value::Value;

/// What a relation pass did to one dependent table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationReport {
    /// Dependent table
    pub table: String,
    /// Field holding relation values
    pub field: String,
    /// Mode the pass ran in
    pub mode: RelationMode,
    /// Surviving records that lost at least one link
    pub unlinked: usize,
    /// Records deleted by a cascade
    pub removed: usize,
}

/// Result of maintaining one relation descriptor
#[derive(Debug)]
pub struct RelationOutcome {
    /// The descriptor this outcome belongs to
    pub relation: Relation,
    /// Counts on success, the failure otherwise
    pub result: Result<RelationReport>,
}

impl RelationOutcome {
    /// Check if this relation was maintained successfully
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

enum LinkState {
    Untouched,
    Links { pruned: bool, empty: bool },
    ScalarMatch,
}

fn inspect(record: &mut Record, field: &str, deleted: &[String]) -> LinkState {
    let is_deleted = |value: &Value| value.as_str().is_some_and(|s| deleted.iter().any(|d| d == s));

    match record.get_mut(field) {
        Some(Value::Array(links)) => {
            let before = links.len();
            links.retain(|link| !is_deleted(link));
            LinkState::Links {
                pruned: links.len() != before,
                empty: links.is_empty(),
            }
        }
        Some(value) if is_deleted(value) => LinkState::ScalarMatch,
        _ => LinkState::Untouched,
    }
}

/// Remove the `deleted` relation values from `relation.field` in every record of `doc`
pub fn apply(doc: &mut TableDocument, relation: &Relation, deleted: &[String]) -> RelationReport {
    let mode = relation.mode();
    let mut report = RelationReport {
        table: relation.table.clone(),
        field: relation.field.clone(),
        mode,
        unlinked: 0,
        removed: 0,
    };
    if deleted.is_empty() {
        return report;
    }

    doc.items.retain_mut(|record| {
        match (inspect(record, &relation.field, deleted), mode) {
            (LinkState::Untouched, _) => return true,
            (LinkState::Links { empty: true, .. }, RelationMode::Cascade)
            | (LinkState::ScalarMatch, RelationMode::Cascade) => {
                report.removed += 1;
                return false;
            }
            (LinkState::Links { pruned: false, .. }, _) => return true,
            (LinkState::ScalarMatch, RelationMode::Unset) => {
                record.remove(&relation.field);
            }
            (LinkState::Links { .. }, _) => {}
        }
        report.unlinked += 1;
        true
    });
    report
}
