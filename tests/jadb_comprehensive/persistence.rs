//! Whole-document persistence and shared locking across handles

use crate::common::*;
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn second_handle_sees_writes() {
    let t = TestDb::new();
    t.seed("t", json!([{"n": 1}, {"n": 2}]));

    let other = t.reopen();
    assert_eq!(other.all("t").unwrap().len(), 2);
    other.insert("t", records(json!([{"n": 3}]))).unwrap();
    assert_eq!(ids(&t.db.all("t").unwrap()), vec![1, 2, 3]);
}

#[test]
fn handles_on_one_directory_share_locks() {
    let t = TestDb::new();
    t.db.create("t", true).unwrap();
    let other = t.reopen();

    let _guard = t.db.locks().acquire("t").unwrap();
    assert!(other.locks().is_locked("t"));
}

#[test]
fn concurrent_handles_never_tear_the_document() {
    let t = TestDb::new();
    t.db.create("t", true).unwrap();

    const WRITERS: usize = 4;
    const ROUNDS: usize = 15;
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|n| {
            let db = t.reopen();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..ROUNDS {
                    db.insert_item("t", Record::new().with("writer", n as i64))
                        .unwrap();
                    if round % 5 == 4 {
                        db.delete("t", &WhereClause::id((n * ROUNDS + round) as u64))
                            .unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let raw = std::fs::read_to_string(t.path().join("t.json")).unwrap();
    let doc: jadb::TableDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc.maxid, (WRITERS * ROUNDS) as u64);
    let mut seen = ids(&doc.items);
    seen.dedup();
    assert_eq!(seen.len(), doc.items.len());
    assert!(!t.path().join("t.json.tmp").exists());
}
