//! Query pipeline: filter, order, limit
//!
//! Each stage is a pure function over an owned record sequence and can be
//! used on its own; [`run`] composes them in select order. A stage given
//! `None` passes the records through unchanged.

use super::evaluator::matches;
use jadb_core::query::{Direction, Limit, OrderKey, OrderSpec, Query, WhereClause};
use jadb_core::record::Record;
use jadb_core::value::{sort_order, Value};
use std::cmp::Ordering;

/// Keep the records matching `clause`, preserving order
pub fn filter(records: Vec<Record>, clause: Option<&WhereClause>) -> Vec<Record> {
    match clause {
        Some(clause) => records
            .into_iter()
            .filter(|record| matches(record, clause))
            .collect(),
        None => records,
    }
}

/// Sort by the keys of `spec`, first non-equal key decides
///
/// The sort is stable: records tied on every key keep their input order.
pub fn order(mut records: Vec<Record>, spec: Option<&OrderSpec>) -> Vec<Record> {
    if let Some(spec) = spec {
        records.sort_by(|a, b| compare_records(a, b, spec));
    }
    records
}

/// Keep the window `[start, start + count)`, clamped to the available records
pub fn limit(records: Vec<Record>, limit: Option<Limit>) -> Vec<Record> {
    match limit {
        Some(Limit { start, count }) => records.into_iter().skip(start).take(count).collect(),
        None => records,
    }
}

/// filter -> order -> limit
pub fn run(records: Vec<Record>, query: &Query) -> Vec<Record> {
    let records = filter(records, query.filter.as_ref());
    let records = order(records, query.order.as_ref());
    limit(records, query.limit)
}

/// Multi-key comparator used by [`order`]
pub fn compare_records(a: &Record, b: &Record, spec: &OrderSpec) -> Ordering {
    for key in spec.keys() {
        let ordering = compare_key(a, b, key);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_key(a: &Record, b: &Record, key: &OrderKey) -> Ordering {
    let ordering = if key.ignorecase {
        let left = folded(a.get(&key.field));
        let right = folded(b.get(&key.field));
        sort_order(left.as_ref(), right.as_ref())
    } else {
        sort_order(a.get(&key.field), b.get(&key.field))
    };

    match key.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// Lower-cased string form of a present value; absent stays absent
fn folded(value: Option<&Value>) -> Option<Value> {
    value.map(|v| Value::String(v.to_coerced_string().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jadb_core::query::Condition;
    use proptest::prelude::*;

    fn letters(records: &[Record], field: &str) -> String {
        records
            .iter()
            .map(|r| r.get(field).and_then(Value::as_str).unwrap_or("-"))
            .collect()
    }

    fn sample() -> Vec<Record> {
        ["c", "a", "B", "b"]
            .iter()
            .enumerate()
            .map(|(i, s)| Record::new().with("_id", i as i64 + 1).with("k", *s))
            .collect()
    }

    #[test]
    fn test_filter_without_clause_is_identity() {
        let records = sample();
        assert_eq!(filter(records.clone(), None), records);
    }

    #[test]
    fn test_filter_keeps_order() {
        let clause = WhereClause::from(Condition::new(
            "_id",
            jadb_core::query::Operator::Ne,
            2,
        ));
        assert_eq!(letters(&filter(sample(), Some(&clause)), "k"), "cBb");
    }

    #[test]
    fn test_order_case_sensitive_and_ignorecase() {
        let asc = OrderSpec::from(OrderKey::asc("k"));
        assert_eq!(letters(&order(sample(), Some(&asc)), "k"), "Babc");

        let folded = OrderSpec::from(OrderKey::asc("k").ignore_case());
        // "B" and "b" tie once folded and keep their input order
        assert_eq!(letters(&order(sample(), Some(&folded)), "k"), "aBbc");

        let desc = OrderSpec::from(OrderKey::desc("k"));
        assert_eq!(letters(&order(sample(), Some(&desc)), "k"), "cbaB");
    }

    #[test]
    fn test_absent_sort_key_comes_first() {
        let mut records = sample();
        records.push(Record::new().with("_id", 5));
        let asc = OrderSpec::from(OrderKey::asc("k"));
        assert_eq!(letters(&order(records, Some(&asc)), "k"), "-Babc");
    }

    #[test]
    fn test_order_sorts_nan_after_numbers() {
        let values = [
            Value::Float(f64::NAN),
            Value::Int(3),
            Value::Float(1.5),
            Value::Float(f64::NAN),
            Value::Int(-1),
        ];
        let records: Vec<Record> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::new().with("_id", i as i64 + 1).with("n", v.clone()))
            .collect();

        let sorted = order(records, Some(&OrderSpec::from(OrderKey::asc("n"))));
        let ids: Vec<u64> = sorted.iter().filter_map(Record::id).collect();
        assert_eq!(ids, vec![5, 3, 2, 1, 4]);
    }

    #[test]
    fn test_limit_windows() {
        assert_eq!(letters(&limit(sample(), Some(Limit::count(2))), "k"), "ca");
        assert_eq!(letters(&limit(sample(), Some(Limit::window(1, 2))), "k"), "aB");
        assert_eq!(letters(&limit(sample(), Some(Limit::window(3, 10))), "k"), "b");
        assert!(limit(sample(), Some(Limit::window(10, 1))).is_empty());
        assert!(limit(sample(), Some(Limit::window(1, 0))).is_empty());
        assert_eq!(limit(sample(), None).len(), 4);
        assert_eq!(letters(&limit(sample(), Some(Limit::all())), "k"), "caBb");
    }

    #[test]
    fn test_run_composes_stages() {
        let query = Query::new()
            .filter(WhereClause::from(Condition::new(
                "_id",
                jadb_core::query::Operator::Gt,
                1,
            )))
            .order(OrderKey::desc("k"))
            .limit(Limit::count(2));
        assert_eq!(letters(&run(sample(), &query), "k"), "ba");
    }

    proptest! {
        #[test]
        fn limit_never_exceeds_bounds(len in 0usize..40, start in 0usize..60, count in 0usize..60) {
            let records: Vec<Record> = (0..len).map(|i| Record::new().with("_id", i as i64)).collect();
            let window = limit(records, Some(Limit::window(start, count)));
            let expected = len.saturating_sub(start).min(count);
            prop_assert_eq!(window.len(), expected);
            if let Some(first) = window.first() {
                prop_assert_eq!(first.id(), Some(start as u64));
            }
        }
    }
}
