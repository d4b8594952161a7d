//! Predicate evaluation and logical combination
//!
//! [`evaluate`] tests one leaf condition against a record; [`combine`] folds a
//! where-clause left to right. Both are total: any input yields a boolean.
//!
//! ## Folding Rules
//!
//! - The fold starts at `true` with the `AND` connector
//! - A connector token only changes the connector used for the next fold
//! - The connector is never reset back to `AND` after use
//! - A nested group is evaluated recursively and folded like a leaf

use jadb_core::query::{Condition, Connector, Operator, Predicate, WhereClause};
use jadb_core::record::Record;
use jadb_core::value::{coerce_to_string, compare_values, strict_equals};
use std::cmp::Ordering;

/// Test a single leaf condition against a record
pub fn evaluate(record: &Record, condition: &Condition) -> bool {
    let left = record.get(&condition.field);
    let right = condition.value.as_ref();

    match condition.op {
        Operator::Eq => strict_equals(left, right),
        Operator::Ne => !strict_equals(left, right),
        Operator::Lt => compare_values(left, right).is_some_and(Ordering::is_lt),
        Operator::Gt => compare_values(left, right).is_some_and(Ordering::is_gt),
        Operator::Le => compare_values(left, right).is_some_and(Ordering::is_le),
        Operator::Ge => compare_values(left, right).is_some_and(Ordering::is_ge),
        Operator::Starts => coerce_to_string(left).starts_with(&coerce_to_string(right)),
        Operator::Ends => coerce_to_string(left).ends_with(&coerce_to_string(right)),
        Operator::Contains => coerce_to_string(left).contains(&coerce_to_string(right)),
        Operator::Defined => left.is_some(),
    }
}

/// Fold a sequence of predicates, connectors and groups into one boolean
pub fn combine(record: &Record, items: &[Predicate]) -> bool {
    let mut result = true;
    let mut connector = Connector::And;

    for item in items {
        match item {
            Predicate::Connector(next) => connector = *next,
            Predicate::Group(group) => {
                result = connector.combine(result, combine(record, group));
            }
            Predicate::Condition(condition) => {
                result = connector.combine(result, evaluate(record, condition));
            }
        }
    }
    result
}

/// Check whether a record satisfies a where-clause
pub fn matches(record: &Record, clause: &WhereClause) -> bool {
    combine(record, clause.items())
}
