//! SQLite storage bootstrap, schema migrations and scoped sessions.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the registry core.
//! - Apply schema migrations in deterministic order.
//! - Hand out one scoped session per logical repository operation.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A session is never shared between two repository calls.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod session;

pub use open::{open_db, open_db_in_memory};
pub use session::{Database, Session, SessionProvider};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A lookup that must match exactly one row matched none.
    NoRowFound {
        table: &'static str,
        column: &'static str,
    },
    /// A lookup on a unique column matched more than one row.
    MultipleRowsFound {
        table: &'static str,
        column: &'static str,
        count: usize,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::NoRowFound { table, column } => {
                write!(f, "no row was found in `{table}` for unique column `{column}`")
            }
            Self::MultipleRowsFound {
                table,
                column,
                count,
            } => write!(
                f,
                "expected one row in `{table}` for unique column `{column}`, found {count}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::NoRowFound { .. } => None,
            Self::MultipleRowsFound { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
