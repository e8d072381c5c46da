//! Scoped storage sessions.
//!
//! # Responsibility
//! - Own the database location and bootstrap it exactly once.
//! - Hand out a fresh connection per repository operation.
//!
//! # Invariants
//! - Every `Session` is released when dropped, on every exit path.
//! - In-memory databases stay alive for as long as their `Database` lives.

use super::open::{configure_connection, open_db, open_shared_memory};
use super::DbResult;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

/// Source of scoped sessions for repositories.
pub trait SessionProvider {
    /// Acquires a new session. The caller releases it by dropping it.
    fn acquire(&self) -> DbResult<Session>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn acquire(&self) -> DbResult<Session> {
        (**self).acquire()
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    fn acquire(&self) -> DbResult<Session> {
        (**self).acquire()
    }
}

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    SharedMemory(String),
}

/// Migrated registry database that opens one connection per session.
pub struct Database {
    target: Target,
    // Keeps a shared-cache in-memory database from being dropped by SQLite
    // when no session is open.
    _anchor: Option<Mutex<Connection>>,
}

impl Database {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        drop(conn);
        Ok(Self {
            target: Target::File(path),
            _anchor: None,
        })
    }

    /// Opens a fresh, uniquely named in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:student-registry-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let anchor = open_shared_memory(&uri)?;
        Ok(Self {
            target: Target::SharedMemory(uri),
            _anchor: Some(Mutex::new(anchor)),
        })
    }

    /// Returns the database file path, or `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File(path) => Some(path.as_path()),
            Target::SharedMemory(_) => None,
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match &self.target {
            Target::File(path) => Connection::open(path),
            Target::SharedMemory(uri) => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
    }
}

impl SessionProvider for Database {
    fn acquire(&self) -> DbResult<Session> {
        let conn = self.connect().map_err(|err| {
            error!("event=session_acquire module=db status=error error={err}");
            err
        })?;
        configure_connection(&conn)?;
        debug!("event=session_acquire module=db status=ok");
        Ok(Session {
            conn,
            acquired_at: Instant::now(),
        })
    }
}

/// One scoped connection. Dereferences to [`Connection`] for queries.
pub struct Session {
    conn: Connection,
    acquired_at: Instant,
}

impl Session {
    /// Starts a deferred transaction. Dropping it without commit rolls back.
    pub fn transaction(&mut self) -> DbResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            "event=session_release module=db status=ok held_ms={}",
            self.acquired_at.elapsed().as_millis()
        );
    }
}
