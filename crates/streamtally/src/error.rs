//! Error types for the cache engine.

use streamtally_core::{CacheId, TupleError, TupleKey};
use streamtally_store::StoreError;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Update and undo propagate every failure to the caller; partial or silent
/// recovery is disallowed because exactly-once-equivalent counting depends
/// on the caller correctly pairing update and undo.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Malformed wire tuple.
    #[error("tuple error: {0}")]
    Tuple(#[from] TupleError),

    /// Backing-store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Undo attempted with no matching prior update, or a reversal that
    /// would leave the record inconsistent. The record is left unchanged.
    #[error("underflow on undo for {key} in cache {cache}")]
    UnderflowOnUndo { cache: CacheId, key: TupleKey },
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
