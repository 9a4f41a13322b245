//! In-memory implementation of the Store trait.
//!
//! Primarily for testing and embedding. Same semantics as SQLite but keeps
//! everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use streamtally_core::{CacheId, CountRecord, Ident, TupleKey};

use crate::error::Result;
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// BTreeMap gives scans their key order for free.
pub struct MemoryStore {
    records: RwLock<BTreeMap<(CacheId, TupleKey), CountRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records across all cache namespaces.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, cache: &CacheId, key: &TupleKey) -> Result<Option<CountRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(&(cache.clone(), key.clone())).cloned())
    }

    async fn put(&self, cache: &CacheId, key: &TupleKey, record: &CountRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert((cache.clone(), key.clone()), record.clone());
        Ok(())
    }

    async fn scan(
        &self,
        cache: &CacheId,
        subject: Option<&Ident>,
    ) -> Result<Vec<(TupleKey, CountRecord)>> {
        let records = self.records.read().unwrap();

        let entries = records
            .iter()
            .filter(|((c, key), _)| {
                c == cache && subject.map_or(true, |subj| &key.subject == subj)
            })
            .map(|((_, key), record)| (key.clone(), record.clone()))
            .collect();

        Ok(entries)
    }
}
