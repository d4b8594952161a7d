//! Table lifecycle through the facade

use crate::common::*;
use jadb::Error;
use serde_json::json;

#[test]
fn create_drop_cycle() {
    let t = TestDb::new();
    assert!(t.db.create("banyan", false).unwrap());
    assert!(!t.db.create("banyan", false).unwrap());
    assert!(matches!(
        t.db.create("banyan", true),
        Err(Error::AlreadyExists { .. })
    ));
    t.db.drop("banyan").unwrap();
    t.db.drop("banyan").unwrap();
    assert!(!t.path().join("banyan.json").exists());
}

#[test]
fn truncate_keeps_table_and_restarts_ids() {
    let t = TestDb::new();
    t.seed("t", json!([{"a": 1}, {"a": 2}, {"a": 3}]));
    t.db.truncate("t").unwrap();

    assert!(t.db.exists("t").unwrap());
    assert!(t.db.all("t").unwrap().is_empty());
    let again = t.db.insert("t", records(json!([{"a": 4}]))).unwrap();
    assert_eq!(ids(&again), vec![1]);
}

#[test]
fn operations_on_missing_table_fail_cleanly() {
    let t = TestDb::new();
    assert!(t.db.all("ghost").unwrap_err().is_not_found());
    assert!(t.db.find("ghost", 1).unwrap_err().is_not_found());
    assert!(t.db.truncate("ghost").unwrap_err().is_not_found());
    assert!(t.db.delete_item("ghost", 1).unwrap_err().is_not_found());
    assert!(t.db.locks().locked_tables().is_empty());
}

#[test]
fn update_stamps_modified_but_not_created() {
    let t = TestDb::new();
    let inserted = t.seed("t", json!([{"color": "green"}]));
    let created = inserted[0].get(jadb::CREATED_FIELD).cloned();

    let updated = t
        .db
        .update_item("t", 1, &Record::new().with("color", "black").with("_created", "x"))
        .unwrap()
        .unwrap();
    assert_eq!(updated.get(jadb::CREATED_FIELD).cloned(), created);
    assert!(updated.get(jadb::MODIFIED_FIELD).is_some());
    assert_eq!(updated.get("color"), Some(&Value::from("black")));
}
