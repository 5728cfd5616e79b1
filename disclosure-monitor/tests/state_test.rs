use disclosure_monitor::{JsonFileSeenStore, MonitorError, SeenSet, SeenStore};
use std::fs;
use tempfile::TempDir;

fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileSeenStore::new(dir.path().join("seen_trades.json"));

    assert!(store.load().is_empty());
    assert!(!store.path().exists(), "Loading must not create the file");
}

#[test]
fn test_corrupt_file_loads_empty() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("seen_trades.json");
    fs::write(&path, "{ not json").expect("write corrupt file");

    let store = JsonFileSeenStore::new(&path);
    assert!(store.load().is_empty());

    // Wrong shape is treated the same way
    fs::write(&path, r#"{"keys": ["a"]}"#).expect("write object");
    assert!(store.load().is_empty());
}

#[test]
fn test_commit_writes_union_and_reloads() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileSeenStore::new(dir.path().join("seen_trades.json"));

    store.commit(&keys(&["b", "a"]), &SeenSet::new()).expect("first commit");
    let loaded = store.load();
    assert_eq!(loaded.len(), 2);

    store.commit(&keys(&["c", "a"]), &loaded).expect("second commit");
    let reloaded = store.load();
    let all: Vec<&String> = reloaded.iter().collect();
    assert_eq!(all, vec!["a", "b", "c"]);

    // Stored as a plain sorted JSON array
    let content = fs::read_to_string(store.path()).expect("read seen file");
    let stored: Vec<String> = serde_json::from_str(&content).expect("JSON array");
    assert_eq!(stored, keys(&["a", "b", "c"]));
}

#[test]
fn test_commit_leaves_no_temp_files_behind() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileSeenStore::new(dir.path().join("seen_congress_trades.json"));

    for round in 0..3 {
        let existing = store.load();
        store
            .commit(&[format!("key-{}", round)], &existing)
            .expect("commit");
    }

    let entries: Vec<String> = fs::read_dir(dir.path())
        .expect("list dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["seen_congress_trades.json"]);
    assert_eq!(store.load().len(), 3);
}

#[test]
fn test_commit_replaces_corrupt_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("seen_trades.json");
    fs::write(&path, "garbage").expect("write corrupt file");

    let store = JsonFileSeenStore::new(&path);
    let existing = store.load();
    store.commit(&keys(&["fresh"]), &existing).expect("commit over corrupt file");

    assert!(store.load().contains("fresh"));
}

#[test]
fn test_commit_creates_state_directory() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileSeenStore::new(dir.path().join("state").join("nested").join("seen.json"));

    store.commit(&keys(&["k"]), &SeenSet::new()).expect("commit");
    assert!(store.path().exists());
}

#[test]
fn test_commit_into_unwritable_location_fails() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").expect("write blocker");

    let store = JsonFileSeenStore::new(blocker.join("seen.json"));
    match store.commit(&keys(&["k"]), &SeenSet::new()) {
        Err(MonitorError::StoreWrite { path, .. }) => assert_eq!(path, store.path()),
        other => panic!("Expected a store write error, got {:?}", other),
    }
}
