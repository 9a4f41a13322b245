//! Count records: per-key running state with a one-level rollback snapshot.

use serde::{Deserialize, Serialize};

/// The pre-update state captured by the most recent [`CountRecord::apply`].
///
/// An undo restores exactly these values and consumes the snapshot, so a
/// second consecutive undo on the same key has nothing to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Count before the update.
    pub count: i64,
    /// Last-seen time before the update.
    pub time: i64,
}

/// Per-key cache state: running count, most recent event time, and the
/// rollback snapshot.
///
/// The count is the sum of all applied deltas minus reversed deltas, and is
/// never negative in steady state. Records are created lazily by the first
/// update for a key and are never deleted by the cache itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRecord {
    /// Running count for the key.
    pub count: i64,

    /// Most recent event time seen for the key (Unix ms).
    pub last_time: i64,

    /// Rollback snapshot from the most recent update, if not yet consumed.
    pub snapshot: Option<Snapshot>,
}

impl CountRecord {
    /// The zero-valued record used before a key's first update.
    pub fn zero() -> Self {
        Self {
            count: 0,
            last_time: 0,
            snapshot: None,
        }
    }

    /// Apply a delta at the given event time.
    ///
    /// Captures the pre-update state as the new snapshot, adds the delta,
    /// and advances `last_time` to `max(last_time, time)`.
    pub fn apply(&mut self, delta: i64, time: i64) {
        self.snapshot = Some(Snapshot {
            count: self.count,
            time: self.last_time,
        });
        self.count += delta;
        if time > self.last_time {
            self.last_time = time;
        }
    }

    /// Reverse the most recent update by restoring the snapshot.
    ///
    /// Returns the restored state, or `None` when no snapshot is available
    /// (no prior update, or the snapshot was already consumed by an undo).
    /// The record is left untouched in the `None` case.
    pub fn rollback(&mut self) -> Option<Snapshot> {
        let snap = self.snapshot.take()?;
        self.count = snap.count;
        self.last_time = snap.time;
        Some(snap)
    }
}

impl Default for CountRecord {
    fn default() -> Self {
        Self::zero()
    }
}
