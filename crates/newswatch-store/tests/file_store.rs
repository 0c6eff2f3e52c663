//! `FileStateStore` against a real temp directory.

use std::collections::BTreeSet;

use newswatch_core::{StateStore, StoreError};
use newswatch_store::{FileStateStore, FILTER_KEYWORDS_FILE, LAST_SEEN_FILE};

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

#[test]
fn last_seen_is_absent_on_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    assert_eq!(store.read_last_seen_id().unwrap(), None);
}

#[test]
fn last_seen_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    store.write_last_seen_id("101").unwrap();
    store.write_last_seen_id("102").unwrap();

    let reopened = FileStateStore::open(dir.path()).unwrap();
    assert_eq!(reopened.read_last_seen_id().unwrap().as_deref(), Some("102"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join(LAST_SEEN_FILE)).unwrap(),
        "102"
    );
}

#[test]
fn last_seen_is_trimmed_and_blank_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(LAST_SEEN_FILE), "  77\n").unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    assert_eq!(store.read_last_seen_id().unwrap().as_deref(), Some("77"));

    std::fs::write(dir.path().join(LAST_SEEN_FILE), "\n").unwrap();
    assert_eq!(store.read_last_seen_id().unwrap(), None);
}

#[test]
fn clear_removes_marker() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    store.write_last_seen_id("5").unwrap();

    store.clear_last_seen_id().unwrap();

    assert_eq!(store.read_last_seen_id().unwrap(), None);
    assert!(!dir.path().join(LAST_SEEN_FILE).exists());
}

#[test]
fn clear_without_marker_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    let err = store.clear_last_seen_id().unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
}

#[test]
fn filter_is_seeded_and_persisted_on_first_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    let keywords = store.read_filter_keywords().unwrap();

    assert_eq!(keywords, set(&["listing", "token"]));
    let raw = std::fs::read_to_string(dir.path().join(FILTER_KEYWORDS_FILE)).unwrap();
    let persisted: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, vec!["listing".to_string(), "token".to_string()]);
}

#[test]
fn empty_filter_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    store.write_filter_keywords(&BTreeSet::new()).unwrap();

    assert!(store.read_filter_keywords().unwrap().is_empty());
}

#[test]
fn filter_write_replaces_whole_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    store.write_filter_keywords(&set(&["listing", "token"])).unwrap();

    store.write_filter_keywords(&set(&["airdrop"])).unwrap();

    assert_eq!(store.read_filter_keywords().unwrap(), set(&["airdrop"]));
}

#[test]
fn filter_read_normalizes_and_dedupes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(FILTER_KEYWORDS_FILE),
        r#"["Listing", " token ", "listing", ""]"#,
    )
    .unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    assert_eq!(store.read_filter_keywords().unwrap(), set(&["listing", "token"]));
}

#[test]
fn corrupt_filter_is_an_error_not_a_reset() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(FILTER_KEYWORDS_FILE), "{not json").unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();

    let err = store.read_filter_keywords().unwrap_err();

    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join(FILTER_KEYWORDS_FILE)).unwrap(),
        "{not json"
    );
}

#[test]
fn records_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    store.write_filter_keywords(&set(&["defi"])).unwrap();
    store.write_last_seen_id("9").unwrap();

    store.clear_last_seen_id().unwrap();

    assert_eq!(store.read_filter_keywords().unwrap(), set(&["defi"]));
}

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("state").join("newswatch");

    let store = FileStateStore::open(&nested).unwrap();
    store.write_last_seen_id("1").unwrap();

    assert!(nested.join(LAST_SEEN_FILE).exists());
    assert_eq!(store.dir(), nested.as_path());
}

#[test]
fn poll_lock_excludes_a_second_holder() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    let other = FileStateStore::open(dir.path()).unwrap();

    let held = store.try_lock_poll().unwrap();
    assert!(held.is_some());
    assert!(other.try_lock_poll().unwrap().is_none());

    drop(held);
    assert!(other.try_lock_poll().unwrap().is_some());
}

#[test]
fn poll_lock_leaves_records_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    store.write_last_seen_id("7").unwrap();

    let _lock = store.try_lock_poll().unwrap().expect("lock should be free");

    assert_eq!(store.read_last_seen_id().unwrap().as_deref(), Some("7"));
}
