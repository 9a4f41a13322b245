//! Test fixtures and helpers.
//!
//! Common setup code for cache tests: a memory-backed engine bound to one
//! namespace, with shorthand for building and applying event tuples.

use streamtally::{CacheId, CountCache, CountSummary, Result, Tuple, TupleKey};
use streamtally_store::MemoryStore;

/// A test fixture with a memory-backed cache bound to one namespace.
pub struct TestFixture {
    pub cache: CountCache<MemoryStore>,
    pub namespace: CacheId,
}

impl TestFixture {
    /// Create a fixture over a fresh memory store, namespace `"test"`.
    pub fn new() -> Self {
        Self::with_namespace("test")
    }

    /// Create a fixture with an explicit namespace.
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            cache: CountCache::new(MemoryStore::new()),
            namespace: CacheId::from(namespace),
        }
    }

    /// Build a wire tuple in this fixture's namespace.
    pub fn tuple(&self, subj: &str, action: &str, obj: &str, delta: i64, time: i64) -> Tuple {
        Tuple::new(
            self.namespace.clone(),
            TupleKey::new(subj, action, obj),
            delta,
            time,
        )
    }

    /// Apply a sequence of `(subject, action, object, delta, time)` events
    /// as updates.
    pub async fn apply(&self, events: &[(&str, &str, &str, i64, i64)]) -> Result<()> {
        for (subj, action, obj, delta, time) in events {
            self.cache
                .update(&self.tuple(subj, action, obj, *delta, *time))
                .await?;
        }
        Ok(())
    }

    /// A query handle over this fixture's namespace.
    pub fn summary(&self) -> CountSummary<MemoryStore> {
        self.cache.summary(self.namespace.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
