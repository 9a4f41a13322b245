//! # Streamtally
//!
//! An incrementally maintained tuple-count cache over a stream of
//! (subject, action, object, time) events, with compensating update/undo
//! and a read-side aggregate query surface.
//!
//! ## Overview
//!
//! A stream-processing runtime delivers 4-element wire tuples
//! `[cache, key, delta, time]`. The cache keeps one [`CountRecord`] per key
//! in an externally supplied store and answers aggregate queries over it:
//!
//! - **Update/Undo**: [`CountCache`] applies deltas atomically per key and
//!   reverses the most recent update via a one-level rollback snapshot.
//! - **Queries**: [`CountSummary`] enumerates actions, sums counts, and
//!   lists matching tuples, optionally sorted. Queries never mutate.
//!
//! ## Key Concepts
//!
//! - **Per-key atomicity**: read-modify-write for one key is indivisible;
//!   unrelated keys never serialize against each other.
//! - **Store is the source of truth**: the aggregation index is derived by
//!   scanning the store, never materialized separately.
//! - **Absence is normal**: unseen keys read as zero-valued results, never
//!   as errors.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use streamtally::CountCache;
//! use streamtally::core::{CacheId, Tuple, TupleKey};
//! use streamtally::store::MemoryStore;
//!
//! async fn example() {
//!     let cache = CountCache::new(MemoryStore::new());
//!
//!     let tuple = Tuple::new("c1", TupleKey::new("alice", "like", "post1"), 1, 1000);
//!     let result = cache.update(&tuple).await.unwrap();
//!     assert_eq!(result.value, 1);
//!
//!     let summary = cache.summary(CacheId::from("c1"));
//!     let triple = summary
//!         .get_count(&"alice".into(), &"like".into(), &"post1".into())
//!         .await
//!         .unwrap();
//!     assert_eq!(triple.count, 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `streamtally::core` - Core primitives (keys, records, tuples, ordering)
//! - `streamtally::store` - Storage abstraction, memory and SQLite backends

pub mod cache;
pub mod error;
pub mod index;
mod locks;
pub mod queries;

// Re-export component crates
pub use streamtally_core as core;
pub use streamtally_store as store;

// Re-export main types for convenience
pub use cache::{CacheConfig, CountCache};
pub use error::{CacheError, Result};
pub use index::AggregationIndex;
pub use queries::CountSummary;

// Re-export commonly used core types
pub use streamtally_core::{
    CacheId, CountRecord, CountTriple, CountTuple, Filter, Ident, Snapshot, Tuple, TupleKey,
};
