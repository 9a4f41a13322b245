//! Stripe-based per-key locking for the update/undo engine.
//!
//! Keys are hashed to a fixed set of stripes; the stripe mutex makes the
//! read-modify-write for one key indivisible while keys on different
//! stripes proceed concurrently. There is no global lock.

use tokio::sync::{Mutex, MutexGuard};
use xxhash_rust::xxh3::xxh3_64;

use streamtally_core::{CacheId, TupleKey};

/// Per-key lock striping over (cache, key).
///
/// Async mutexes, since the critical section spans store I/O. A single
/// stripe is acquired per operation, so stripe ordering never matters.
pub(crate) struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    /// Create a lock table with the given number of stripes.
    ///
    /// # Panics
    ///
    /// Panics if `num_stripes` is 0.
    pub fn new(num_stripes: usize) -> Self {
        assert!(num_stripes > 0, "num_stripes must be positive");
        Self {
            stripes: (0..num_stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Hash a (cache, key) pair to its stripe index.
    fn stripe_index(&self, cache: &CacheId, key: &TupleKey) -> usize {
        let mut buf = Vec::with_capacity(
            cache.as_str().len()
                + key.subject.as_str().len()
                + key.action.as_str().len()
                + key.object.as_str().len()
                + 4,
        );
        for part in [
            cache.as_str(),
            key.subject.as_str(),
            key.action.as_str(),
            key.object.as_str(),
        ] {
            buf.extend_from_slice(part.as_bytes());
            buf.push(0);
        }
        (xxh3_64(&buf) as usize) % self.stripes.len()
    }

    /// Acquire the stripe lock covering the given key.
    pub async fn lock(&self, cache: &CacheId, key: &TupleKey) -> MutexGuard<'_, ()> {
        let idx = self.stripe_index(cache, key);
        self.stripes[idx].lock().await
    }

    /// Number of stripes.
    #[cfg(test)]
    pub fn num_stripes(&self) -> usize {
        self.stripes.len()
    }
}
