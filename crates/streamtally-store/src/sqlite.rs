//! SQLite implementation of the Store trait.
//!
//! The persistent backend for streamtally. Uses rusqlite with bundled
//! SQLite behind a Mutex; one row per (cache, subject, action, object) key.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use streamtally_core::{CacheId, CountRecord, Ident, Snapshot, TupleKey};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::Store;

/// SQLite-based store implementation.
///
/// Thread-safe via an internal Mutex around the connection. Row ordering of
/// scans is fixed by an ORDER BY, matching the deterministic-scan contract.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }
}

// Helper to convert a row to (TupleKey, CountRecord)
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<(TupleKey, CountRecord)> {
    let subject: String = row.get("subject")?;
    let action: String = row.get("action")?;
    let object: String = row.get("object")?;
    let count: i64 = row.get("count")?;
    let last_time: i64 = row.get("last_time")?;
    let snapshot_cbor: Option<Vec<u8>> = row.get("snapshot")?;

    let snapshot: Option<Snapshot> = match snapshot_cbor {
        Some(bytes) => Some(ciborium::from_reader(bytes.as_slice()).map_err(|_| {
            rusqlite::Error::InvalidColumnType(6, "snapshot".into(), rusqlite::types::Type::Blob)
        })?),
        None => None,
    };

    Ok((
        TupleKey::new(subject, action, object),
        CountRecord {
            count,
            last_time,
            snapshot,
        },
    ))
}

// Helper to encode a snapshot to CBOR
fn encode_snapshot(snapshot: &Option<Snapshot>) -> Result<Option<Vec<u8>>> {
    snapshot
        .map(|snap| {
            let mut buf = Vec::new();
            ciborium::into_writer(&snap, &mut buf)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(buf)
        })
        .transpose()
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, cache: &CacheId, key: &TupleKey) -> Result<Option<CountRecord>> {
        self.with_conn(|conn| {
            let entry = conn
                .query_row(
                    "SELECT subject, action, object, count, last_time, snapshot
                     FROM count_records
                     WHERE cache = ?1 AND subject = ?2 AND action = ?3 AND object = ?4",
                    params![
                        cache.as_str(),
                        key.subject.as_str(),
                        key.action.as_str(),
                        key.object.as_str()
                    ],
                    row_to_entry,
                )
                .optional()?;

            Ok(entry.map(|(_, record)| record))
        })
    }

    async fn put(&self, cache: &CacheId, key: &TupleKey, record: &CountRecord) -> Result<()> {
        let snapshot_cbor = encode_snapshot(&record.snapshot)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO count_records (cache, subject, action, object, count, last_time, snapshot)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (cache, subject, action, object)
                 DO UPDATE SET count = ?5, last_time = ?6, snapshot = ?7",
                params![
                    cache.as_str(),
                    key.subject.as_str(),
                    key.action.as_str(),
                    key.object.as_str(),
                    record.count,
                    record.last_time,
                    snapshot_cbor,
                ],
            )?;
            Ok(())
        })
    }

    async fn scan(
        &self,
        cache: &CacheId,
        subject: Option<&Ident>,
    ) -> Result<Vec<(TupleKey, CountRecord)>> {
        self.with_conn(|conn| {
            let entries = match subject {
                Some(subj) => {
                    let mut stmt = conn.prepare(
                        "SELECT subject, action, object, count, last_time, snapshot
                         FROM count_records
                         WHERE cache = ?1 AND subject = ?2
                         ORDER BY subject, action, object",
                    )?;
                    let rows = stmt.query_map(params![cache.as_str(), subj.as_str()], row_to_entry)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT subject, action, object, count, last_time, snapshot
                         FROM count_records
                         WHERE cache = ?1
                         ORDER BY subject, action, object",
                    )?;
                    let rows = stmt.query_map(params![cache.as_str()], row_to_entry)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };

            Ok(entries)
        })
    }
}
