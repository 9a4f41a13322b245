//! # Streamtally Store
//!
//! The backing-store abstraction for the tuple-count cache, plus the two
//! bundled implementations:
//!
//! - [`MemoryStore`] - in-memory, for tests and embedding
//! - [`SqliteStore`] - SQLite-backed, for persistent deployments
//!
//! The cache requires only point get/put semantics plus a subject scan; any
//! mutable associative structure can back it by implementing [`Store`].
//! Durability and cross-node consistency are the implementation's concern,
//! not the cache's.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::Store;
