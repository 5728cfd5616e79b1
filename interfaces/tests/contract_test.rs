use interfaces::{MemorySeenStore, SeenSet, SeenStore, TransactionKind};

#[test]
fn test_transaction_kind_normalization() {
    assert_eq!(TransactionKind::normalize("P - Purchase"), TransactionKind::Purchase);
    assert_eq!(TransactionKind::normalize("Purchase"), TransactionKind::Purchase);
    assert_eq!(TransactionKind::normalize(" buy "), TransactionKind::Purchase);
    assert_eq!(TransactionKind::normalize("S - Sale+OE"), TransactionKind::Sale);
    assert_eq!(TransactionKind::normalize("Sale (Partial)"), TransactionKind::Sale);
    assert_eq!(TransactionKind::normalize("sell"), TransactionKind::Sale);
    assert_eq!(
        TransactionKind::normalize("Exchange"),
        TransactionKind::Other("exchange".to_string())
    );
    assert_eq!(TransactionKind::normalize("Exchange").label(), "exchange");
}

#[test]
fn test_seen_set_union_leaves_original_untouched() {
    let existing: SeenSet = ["a", "b"].into_iter().collect();
    let merged = existing.union_with(&["b".to_string(), "c".to_string()]);

    assert_eq!(existing.len(), 2);
    assert_eq!(merged.len(), 3);
    assert!(merged.contains("c"));
    assert!(!existing.contains("c"));
}

#[test]
fn test_memory_store_counts_commits() {
    let store = MemorySeenStore::with_keys(["k1"]);
    assert_eq!(store.commit_count(), 0);

    let loaded = store.load();
    assert!(loaded.contains("k1"));

    store
        .commit(&["k2".to_string()], &loaded)
        .expect("memory commit never fails");

    assert_eq!(store.commit_count(), 1);
    let after = store.load();
    assert!(after.contains("k1"));
    assert!(after.contains("k2"));
}
