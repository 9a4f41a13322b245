//! # Streamtally Core
//!
//! Pure primitives for the streamtally tuple-count cache: keys, count
//! records, the tuple wire format, and result ordering.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! the cache's data model.
//!
//! ## Key Types
//!
//! - [`TupleKey`] - The counted (subject, action, object) relationship
//! - [`CountRecord`] - Per-key running count, recency, and rollback snapshot
//! - [`Tuple`] - The 4-element update/undo wire unit
//! - [`CountTriple`] / [`CountTuple`] - Query result units
//!
//! ## Ordering
//!
//! Null-tolerant three-way comparators over query results live in the
//! [`ordering`] module.

pub mod error;
pub mod ordering;
pub mod record;
pub mod tuple;
pub mod types;

pub use error::TupleError;
pub use ordering::{
    compare_by_count, compare_by_time, count_comparator, count_time_comparator, time_comparator,
};
pub use record::{CountRecord, Snapshot};
pub use tuple::{CountTriple, CountTuple, Tuple};
pub use types::{CacheId, Filter, Ident, TupleKey};
