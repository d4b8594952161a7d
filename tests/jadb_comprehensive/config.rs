//! Opening databases from `jadb.toml`

use crate::common::*;
use jadb::CONFIG_FILE_NAME;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn open_from_written_default_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    JadbConfig::write_default_if_missing(&path).unwrap();

    let mut config = JadbConfig::from_file(&path).unwrap();
    config.dir = dir.path().join(&config.dir);
    let db = Database::open(&config).unwrap();
    db.create("t", true).unwrap();
    assert!(dir.path().join("jadb").join("t.json").is_file());
}

#[test]
fn lock_policy_comes_from_config() {
    let dir = TempDir::new().unwrap();
    let mut config = JadbConfig::with_dir(dir.path().join("policy"));
    config.lock_retry_delay_ms = 3;
    config.lock_timeout_ms = 0;

    let db = Database::open(&config).unwrap();
    let policy = db.locks().policy();
    assert_eq!(policy.retry_delay, Duration::from_millis(3));
    assert_eq!(policy.timeout, None);
}
