//! The update/undo engine.
//!
//! [`CountCache`] applies wire tuples to per-key count records with
//! per-key atomic read-modify-write, and reverses the most recent update
//! per key from its rollback snapshot.

use std::sync::Arc;

use streamtally_core::{CacheId, CountRecord, Tuple};
use streamtally_store::Store;

use crate::error::{CacheError, Result};
use crate::locks::KeyLocks;
use crate::queries::CountSummary;

/// Configuration for the cache engine.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of lock stripes for per-key critical sections.
    pub lock_stripes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { lock_stripes: 256 }
    }
}

/// The tuple-count cache engine.
///
/// A passive structure invoked synchronously by an external runtime, one
/// call per delivered or replayed unit. The engine owns no scheduler and
/// never suspends except on store latency; it guarantees per-key atomic
/// read-modify-write without a global lock.
pub struct CountCache<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Per-key lock stripes.
    locks: KeyLocks,
}

impl<S: Store> CountCache<S> {
    /// Create a cache over the given store with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    /// Create a cache with explicit configuration.
    pub fn with_config(store: S, config: CacheConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Create a cache over a shared store handle.
    pub fn from_arc(store: Arc<S>, config: CacheConfig) -> Self {
        Self {
            locks: KeyLocks::new(config.lock_stripes),
            store,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// A read-only query handle over one cache namespace, sharing this
    /// engine's store.
    pub fn summary(&self, cache: CacheId) -> CountSummary<S> {
        CountSummary::new(Arc::clone(&self.store), cache)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Update/Undo Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Update the cache with the tuple `[cache, key, delta, time]`.
    ///
    /// Under the key's stripe lock: fetches the record (a zero-valued
    /// default when absent), captures the rollback snapshot, adds the
    /// delta, advances `last_time` to `max(last_time, time)`, and performs
    /// exactly one store write.
    ///
    /// Returns `[cache, key, new_count, new_last_time]`.
    pub async fn update(&self, tuple: &Tuple) -> Result<Tuple> {
        let _guard = self.locks.lock(&tuple.cache, &tuple.key).await;

        let mut record = self
            .store
            .get(&tuple.cache, &tuple.key)
            .await?
            .unwrap_or_else(CountRecord::zero);

        record.apply(tuple.value, tuple.time);
        self.store.put(&tuple.cache, &tuple.key, &record).await?;

        tracing::debug!(
            cache = %tuple.cache,
            key = %tuple.key,
            count = record.count,
            "applied update"
        );

        Ok(Tuple::new(
            tuple.cache.clone(),
            tuple.key.clone(),
            record.count,
            record.last_time,
        ))
    }

    /// Undo the most recent update for the tuple's key.
    ///
    /// Restores count and last-seen time from the rollback snapshot and
    /// consumes it. Fails with `UnderflowOnUndo` - leaving the record
    /// unchanged - when no record exists, the snapshot was already
    /// consumed, or the restore would produce a negative count. Replay
    /// protocols must pair each undo with exactly one preceding update.
    ///
    /// Returns `[cache, key, restored_count, restored_time]`.
    pub async fn undo_update(&self, tuple: &Tuple) -> Result<Tuple> {
        let _guard = self.locks.lock(&tuple.cache, &tuple.key).await;

        let mut record = self
            .store
            .get(&tuple.cache, &tuple.key)
            .await?
            .ok_or_else(|| self.underflow(tuple))?;

        match record.snapshot {
            Some(snap) if snap.count >= 0 => {
                record.rollback();
            }
            _ => {
                tracing::warn!(
                    cache = %tuple.cache,
                    key = %tuple.key,
                    "undo without a matching prior update"
                );
                return Err(self.underflow(tuple));
            }
        }

        self.store.put(&tuple.cache, &tuple.key, &record).await?;

        Ok(Tuple::new(
            tuple.cache.clone(),
            tuple.key.clone(),
            record.count,
            record.last_time,
        ))
    }

    /// Decode a loose wire tuple, then apply it as an update.
    ///
    /// A tuple that fails decoding performs no mutation.
    pub async fn update_raw(&self, raw: &serde_json::Value) -> Result<Tuple> {
        let tuple = Tuple::decode(raw)?;
        self.update(&tuple).await
    }

    /// Decode a loose wire tuple, then apply it as an undo.
    pub async fn undo_update_raw(&self, raw: &serde_json::Value) -> Result<Tuple> {
        let tuple = Tuple::decode(raw)?;
        self.undo_update(&tuple).await
    }

    fn underflow(&self, tuple: &Tuple) -> CacheError {
        CacheError::UnderflowOnUndo {
            cache: tuple.cache.clone(),
            key: tuple.key.clone(),
        }
    }
}
