//! Store trait: the abstract interface for count-record persistence.
//!
//! This trait allows the cache to be storage-agnostic. Implementations
//! include SQLite (persistent) and in-memory (for tests and embedding).

use async_trait::async_trait;
use streamtally_core::{CacheId, CountRecord, Ident, TupleKey};

use crate::error::Result;

/// The Store trait: async interface for count-record persistence.
///
/// The cache requires exactly this narrow capability from its backing
/// storage: point get, point put, and one enumeration operation used by the
/// read-side aggregation index. Callers cannot reach the container behind
/// the trait, so update/undo invariants cannot be bypassed.
///
/// # Design Notes
///
/// - **Namespacing**: every operation is scoped by a [`CacheId`], so one
///   store may back several logical caches.
/// - **Deterministic scans**: for a fixed store state, `scan` returns
///   entries in key order. Queries rely on this for stable results.
/// - **No internal retries**: failures propagate as [`StoreError`] and the
///   cache surfaces them unchanged.
///
/// [`StoreError`]: crate::error::StoreError
#[async_trait]
pub trait Store: Send + Sync {
    /// Get the record for a key, or `None` if the key has never been
    /// updated. Absence is a normal state, not an error.
    async fn get(&self, cache: &CacheId, key: &TupleKey) -> Result<Option<CountRecord>>;

    /// Insert or replace the record for a key.
    async fn put(&self, cache: &CacheId, key: &TupleKey, record: &CountRecord) -> Result<()>;

    /// Enumerate records in a cache namespace, optionally restricted to one
    /// subject.
    ///
    /// Returns `(key, record)` pairs ordered by key.
    async fn scan(
        &self,
        cache: &CacheId,
        subject: Option<&Ident>,
    ) -> Result<Vec<(TupleKey, CountRecord)>>;
}
