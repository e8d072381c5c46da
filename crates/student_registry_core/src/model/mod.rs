//! Registry domain model: user accounts and student applications.
//!
//! # Responsibility
//! - Define persisted record shapes plus their create drafts and update patches.
//! - Define response projections handed to outer layers.
//!
//! # Invariants
//! - Every record is identified by a positive, storage-assigned `RecordId`.
//! - Timestamps are Unix epoch milliseconds.
//! - Deletion is a hard delete; there is no tombstone column.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod affinity;
pub mod student;
pub mod user;

/// Storage-assigned integer primary key.
pub type RecordId = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Projects an optional record into a response shape.
///
/// Returns `None` when given `None`; otherwise a pure field projection.
pub fn to_response<'a, R, T>(record: Option<&'a R>) -> Option<T>
where
    T: From<&'a R>,
{
    record.map(T::from)
}
