//! Relation maintenance across file-backed tables

use crate::common::*;
use jadb::relation_value;
use serde_json::json;

#[test]
fn unset_and_cascade_in_one_delete() {
    let t = TestDb::new();
    t.seed("authors", json!([{"name": "ann"}, {"name": "ben"}]));
    t.seed(
        "books",
        json!([
            {"title": "solo", "authors": ["authors~1"]},
            {"title": "duo", "authors": ["authors~1", "authors~2"]},
            {"title": "other", "authors": ["authors~2"]}
        ]),
    );
    t.seed("quotes", json!([{"by": "authors~1"}, {"by": "authors~2"}]));

    let outcomes = t
        .db
        .delete_item_related(
            "authors",
            1,
            &[Relation::cascade("books", "authors"), Relation::unset("quotes", "by")],
        )
        .unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].relation.table, "books");
    assert_eq!(outcomes[0].result.as_ref().unwrap().removed, 1);
    assert_eq!(outcomes[1].result.as_ref().unwrap().unlinked, 1);

    let books = t.db.all("books").unwrap();
    assert_eq!(ids(&books), vec![2, 3]);
    assert_eq!(
        books[0].get("authors"),
        Some(&Value::from(vec![Value::from(relation_value("authors", 2))]))
    );

    let quotes = t.db.all("quotes").unwrap();
    assert!(!quotes[0].contains("by"));
    assert_eq!(quotes[1].get("by"), Some(&Value::from("authors~2")));
}

#[test]
fn relation_descriptors_from_json() {
    let t = TestDb::new();
    t.seed("owner", json!([{"n": 1}]));
    t.seed("dep", json!([{"ref": "owner~1"}, {"ref": "owner~9"}]));

    let relations: Vec<Relation> =
        serde_json::from_value(json!([{"table": "dep", "field": "ref", "delete": true}])).unwrap();
    let outcomes = t
        .db
        .delete_related("owner", &clause(json!({"field": "n", "value": 1})), &relations)
        .unwrap();
    assert!(outcomes.iter().all(|o| o.is_ok()));
    assert_eq!(ids(&t.db.all("dep").unwrap()), vec![2]);
}

#[test]
fn nothing_deleted_leaves_dependents_alone() {
    let t = TestDb::new();
    t.seed("owner", json!([{"n": 1}]));
    t.seed("dep", json!([{"ref": "owner~1"}]));

    let outcomes = t
        .db
        .delete_item_related("owner", 42, &[Relation::cascade("dep", "ref")])
        .unwrap();
    assert_eq!(outcomes[0].result.as_ref().unwrap().removed, 0);
    assert_eq!(t.db.all("dep").unwrap().len(), 1);
}
