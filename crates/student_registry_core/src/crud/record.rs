//! Record-kind contract shared by filters and repositories.

use crate::model::RecordId;
use crate::security::password::{PasswordError, PasswordHasher};
use rusqlite::{Connection, Row};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// Columns that the unique filter is allowed to look up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    /// Parses a field name. Only `username` and `email` are recognized.
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl Display for UniqueField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted record kind (one table).
///
/// Implementors keep all SQL for their table; filters and repositories only
/// compose the fragments exposed here.
pub trait Record: Sized {
    /// Create request accepted by `insert`.
    type Draft: Clone;
    /// Partial update accepted by `apply_patch`.
    type Patch;

    /// Human label used in messages, e.g. `User`.
    const LABEL: &'static str;
    /// Backing table name.
    const TABLE: &'static str;
    /// `SELECT ... FROM ...` producing rows readable by `from_row`, without a
    /// `WHERE` clause.
    const SELECT_SQL: &'static str;
    /// Primary key column, qualified as needed by `SELECT_SQL`.
    const ID_COLUMN: &'static str;

    /// Qualified column for a unique field, or `None` when this kind has no
    /// such unique column.
    fn unique_column(field: UniqueField) -> Option<&'static str>;

    fn id(&self) -> RecordId;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Returns the draft in the form it is stored, with any password hashed
    /// through `hasher`.
    fn seal_draft<'a>(
        draft: &'a Self::Draft,
        hasher: &dyn PasswordHasher,
    ) -> Result<Cow<'a, Self::Draft>, PasswordError>;

    /// Inserts a sealed draft and returns the storage-assigned id.
    fn insert(conn: &Connection, draft: &Self::Draft) -> rusqlite::Result<RecordId>;

    /// Writes every mutable column back to storage. Returns changed row count.
    fn write(&self, conn: &Connection) -> rusqlite::Result<usize>;

    /// Overwrites each field present in `patch`. A `password` field is
    /// re-hashed through `hasher` before assignment.
    fn apply_patch(
        &mut self,
        patch: &Self::Patch,
        hasher: &dyn PasswordHasher,
    ) -> Result<(), PasswordError>;

    fn stamp_updated_at(&mut self, now_epoch_ms: i64);
}
