use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identity keys already reported to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    keys: BTreeSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn insert_all<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
    }

    /// `self ∪ new_keys`, leaving `self` untouched.
    pub fn union_with(&self, new_keys: &[String]) -> SeenSet {
        let mut merged = self.clone();
        merged.insert_all(new_keys.iter().cloned());
        merged
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SeenSet::new();
        set.insert_all(iter);
        set
    }
}

/// Persisted seen-set for one source.
pub trait SeenStore: Send + Sync {
    /// Never fails: unknown state is treated as "nothing seen".
    fn load(&self) -> SeenSet;

    /// Persist `existing ∪ new_keys` in one atomic write.
    fn commit(&self, new_keys: &[String], existing: &SeenSet) -> Result<()>;
}

/// In-process store. Keeps a commit counter so callers can assert ordering.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    keys: SeenSet,
    commits: usize,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store.state().keys.insert_all(keys);
        store
    }

    pub fn snapshot(&self) -> SeenSet {
        self.state().keys.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.state().commits
    }

    // Updates are single assignments, so a poisoned lock still holds consistent state
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SeenStore for MemorySeenStore {
    fn load(&self) -> SeenSet {
        self.snapshot()
    }

    fn commit(&self, new_keys: &[String], existing: &SeenSet) -> Result<()> {
        let mut state = self.state();
        state.keys = existing.union_with(new_keys);
        state.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_commit_after_poisoned_lock_still_lands() {
        let store = Arc::new(MemorySeenStore::with_keys(["old"]));

        let poisoner = store.clone();
        let outcome = thread::spawn(move || {
            let _guard = poisoner.inner.lock();
            panic!("poison the store lock");
        })
        .join();
        assert!(outcome.is_err());
        assert!(store.inner.is_poisoned());

        let existing = store.load();
        store
            .commit(&["new".to_string()], &existing)
            .expect("commit should succeed");

        let snapshot = store.snapshot();
        assert!(snapshot.contains("old"));
        assert!(snapshot.contains("new"));
        assert_eq!(store.commit_count(), 1);
    }
}
