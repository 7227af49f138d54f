//! In-memory cache store.
//!
//! Maps a source id to the most recent successfully resolved
//! [`CacheRecord`]. Records are held behind `Arc` so readers get a cheap
//! snapshot that stays valid after the entry is replaced. Writes replace a
//! whole record under a single key; a failed refresh never touches the map.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::CacheRecord;

/// Thread-safe map from source id to its latest [`CacheRecord`].
#[derive(Debug, Default)]
pub struct CacheStore {
    records: RwLock<HashMap<String, Arc<CacheRecord>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest record for `source_id`, if any refresh has succeeded.
    pub fn get(&self, source_id: &str) -> Option<Arc<CacheRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(source_id).cloned()
    }

    /// Insert or replace the record for `record.source_id`.
    ///
    /// Returns the shared handle that was stored.
    pub fn insert(&self, record: CacheRecord) -> Arc<CacheRecord> {
        let record = Arc::new(record);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.source_id.clone(), Arc::clone(&record));
        record
    }

    pub fn remove(&self, source_id: &str) -> Option<Arc<CacheRecord>> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(source_id)
    }

    /// Copy of the current map. Records are shared, not cloned.
    pub fn snapshot(&self) -> HashMap<String, Arc<CacheRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, body: &str) -> CacheRecord {
        CacheRecord::file(id, "file:///x", "/x", body.to_string(), Utc::now())
    }

    #[test]
    fn test_empty_on_creation() {
        let store = CacheStore::new();
        assert!(store.is_empty());
        assert!(store.get("s1").is_none());
    }

    #[test]
    fn test_insert_replaces_whole_record() {
        let store = CacheStore::new();
        store.insert(record("s1", "old"));
        let before = store.get("s1").unwrap();
        store.insert(record("s1", "new"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("s1").unwrap().contents.as_deref(), Some("new"));
        // Earlier snapshots are unaffected by the replacement.
        assert_eq!(before.contents.as_deref(), Some("old"));
    }

    #[test]
    fn test_keys_are_independent() {
        let store = CacheStore::new();
        store.insert(record("s1", "one"));
        store.insert(record("s2", "two"));
        store.remove("s1");

        assert!(store.get("s1").is_none());
        assert_eq!(store.get("s2").unwrap().contents.as_deref(), Some("two"));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_concurrent_writes_to_distinct_keys() {
        let store = Arc::new(CacheStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.insert(record(&format!("s{}", i), "body"));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
