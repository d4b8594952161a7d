//! Operator and ordering semantics over heterogeneous values

use crate::common::*;
use jadb::{Limit, OrderKey};
use serde_json::json;

fn mixed(t: &TestDb) {
    t.seed(
        "mixed",
        json!([
            {"v": 10},
            {"v": "10"},
            {"v": 2.5},
            {"v": null},
            {"v": true},
            {"v": ["a", "b"]},
            {"w": 1}
        ]),
    );
}

#[test]
fn equality_does_not_coerce() {
    let t = TestDb::new();
    mixed(&t);
    assert_eq!(ids(&select_where(&t.db, "mixed", json!({"field": "v", "value": 10}))), vec![1]);
    assert_eq!(ids(&select_where(&t.db, "mixed", json!({"field": "v", "value": "10"}))), vec![2]);
    assert_eq!(ids(&select_where(&t.db, "mixed", json!({"field": "v", "value": null}))), vec![4]);
}

#[test]
fn string_operators_coerce_both_sides() {
    let t = TestDb::new();
    mixed(&t);
    let starts_1 = select_where(&t.db, "mixed", json!({"field": "v", "op": "starts", "value": 1}));
    assert_eq!(ids(&starts_1), vec![1, 2]);
    let joined = select_where(&t.db, "mixed", json!({"field": "v", "op": "contains", "value": "a,b"}));
    assert_eq!(ids(&joined), vec![6]);
    let boolean = select_where(&t.db, "mixed", json!({"field": "v", "op": "ends", "value": "rue"}));
    assert_eq!(ids(&boolean), vec![5]);
}

#[test]
fn unknown_operator_means_equality() {
    let t = TestDb::new();
    mixed(&t);
    let hits = select_where(&t.db, "mixed", json!({"field": "v", "op": "resembles", "value": 2.5}));
    assert_eq!(ids(&hits), vec![3]);
}

#[test]
fn absent_sorts_first_and_ties_keep_insert_order() {
    let t = TestDb::new();
    t.seed(
        "people",
        json!([
            {"name": "carol", "team": "b"},
            {"name": "alice"},
            {"name": "bob", "team": "a"},
            {"name": "dave", "team": "b"},
            {"name": "erin"}
        ]),
    );
    let ordered = t
        .db
        .select("people", &Query::new().order(OrderKey::asc("team")))
        .unwrap();
    assert_eq!(ids(&ordered), vec![2, 5, 3, 1, 4]);

    let newest_two = t
        .db
        .select(
            "people",
            &Query::new()
                .order(OrderKey::desc("_id"))
                .limit(Limit::count(2)),
        )
        .unwrap();
    assert_eq!(ids(&newest_two), vec![5, 4]);
}

#[test]
fn connectors_accept_every_spelling() {
    let t = TestDb::new();
    t.seed("n", json!([{"x": 1}, {"x": 2}, {"x": 3}]));
    for or in ["|", "||", "or", "OR", "Or"] {
        let hits = select_where(
            &t.db,
            "n",
            json!([{"field": "x", "value": 1}, or, {"field": "x", "value": 3}]),
        );
        assert_eq!(ids(&hits), vec![1, 3], "connector {}", or);
    }
    for and in ["&", "&&", "and", "AND"] {
        let hits = select_where(
            &t.db,
            "n",
            json!([{"field": "x", "op": ">=", "value": 2}, and, {"field": "x", "op": "<>", "value": 3}]),
        );
        assert_eq!(ids(&hits), vec![2], "connector {}", and);
    }
}

#[test]
fn plain_zero_limit_returns_everything() {
    let t = TestDb::new();
    t.seed("n", json!([{"x": 1}, {"x": 2}, {"x": 3}]));

    let all: Query = serde_json::from_value(json!({"limit": 0})).unwrap();
    assert_eq!(ids(&t.db.select("n", &all).unwrap()), vec![1, 2, 3]);

    let none: Query = serde_json::from_value(json!({"limit": {"start": 0, "count": 0}})).unwrap();
    assert!(t.db.select("n", &none).unwrap().is_empty());
}
