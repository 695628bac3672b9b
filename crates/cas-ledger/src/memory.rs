//! # In-Memory Counter Store
//!
//! A HashMap-backed [`CounterStore`] with real conditional-update semantics,
//! used by tests and the demo binary. Counter rows are created through
//! [`MemoryStore::insert`] (seeding is a catalog concern; the ledger itself
//! never creates or deletes counters).

use crate::store::{CounterRecord, CounterStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Mutex;

pub struct MemoryStore<K> {
    rows: Mutex<HashMap<K, CounterRecord>>,
}

impl<K> MemoryStore<K>
where
    K: Clone + Eq + Hash + Display + Debug + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds or replaces a counter row.
    pub fn insert(&self, key: K, record: CounterRecord) {
        self.rows
            .lock()
            .expect("memory store lock poisoned")
            .insert(key, record);
    }

    /// Reads a row without going through the async store contract. Handy in
    /// assertions.
    pub fn get(&self, key: &K) -> Option<CounterRecord> {
        self.rows
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .copied()
    }

    /// Deletes a row, returning it if present.
    pub fn remove(&self, key: &K) -> Option<CounterRecord> {
        self.rows
            .lock()
            .expect("memory store lock poisoned")
            .remove(key)
    }
}

impl<K> Default for MemoryStore<K>
where
    K: Clone + Eq + Hash + Display + Debug + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K> CounterStore for MemoryStore<K>
where
    K: Clone + Eq + Hash + Display + Debug + Send + Sync,
{
    type Key = K;

    async fn read(&self, key: &K) -> Result<Option<CounterRecord>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(rows.get(key).copied())
    }

    async fn update_if(
        &self,
        key: &K,
        expected: u64,
        record: CounterRecord,
    ) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        match rows.get_mut(key) {
            Some(row) if row.quantity == expected => {
                *row = record;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_returns_seeded_row() {
        let store = MemoryStore::new();
        store.insert("sku-1", CounterRecord::plain(7));

        let row = store.read(&"sku-1").await.unwrap();
        assert_eq!(row, Some(CounterRecord::plain(7)));
        assert_eq!(store.read(&"sku-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_if_matches_only_observed_quantity() {
        let store = MemoryStore::new();
        store.insert("sku-1", CounterRecord::plain(5));

        // Stale expectation: no write
        let matched = store
            .update_if(&"sku-1", 4, CounterRecord::plain(1))
            .await
            .unwrap();
        assert!(!matched);
        assert_eq!(store.get(&"sku-1"), Some(CounterRecord::plain(5)));

        // Fresh expectation: row replaced
        let matched = store
            .update_if(&"sku-1", 5, CounterRecord::plain(2))
            .await
            .unwrap();
        assert!(matched);
        assert_eq!(store.get(&"sku-1"), Some(CounterRecord::plain(2)));
    }

    #[tokio::test]
    async fn update_if_misses_deleted_row() {
        let store: MemoryStore<&str> = MemoryStore::new();
        let matched = store
            .update_if(&"gone", 0, CounterRecord::plain(1))
            .await
            .unwrap();
        assert!(!matched);
    }
}
