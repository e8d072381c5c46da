//! Single-record lookup strategies.
//!
//! # Responsibility
//! - Execute a `Specification` against one session for one record kind.
//!
//! # Invariants
//! - `Index` returns zero or one record; absence is `Ok(None)`.
//! - `Unique` returns exactly one record; zero or several matches are storage
//!   errors because uniqueness is a schema invariant.
//! - Unknown unique fields are rejected before any SQL runs.
//! - Storage errors are logged and returned unchanged.

use crate::crud::record::{Record, UniqueField};
use crate::crud::specification::Specification;
use crate::db::DbError;
use log::{error, info};
use rusqlite::{Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Field the unique filter uses when the caller names none.
pub const DEFAULT_UNIQUE_FIELD: &str = "email";

pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug)]
pub enum FilterError {
    /// Field or specification kind not usable for this lookup.
    InvalidArgument(String),
    Db(DbError),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid filter argument: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for FilterError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for FilterError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lookup strategy. The variant set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Primary key lookup.
    Index,
    /// Lookup by a unique column (`username` or `email`).
    Unique,
}

impl Filter {
    /// Runs `spec` against `conn` for record kind `R`.
    ///
    /// For `Index`, `field` only selects the statement path (query vs. direct
    /// key fetch); both paths yield the same outcome. For `Unique`, `field`
    /// names the column and defaults to [`DEFAULT_UNIQUE_FIELD`].
    pub fn filter<R: Record>(
        &self,
        spec: &Specification,
        conn: &Connection,
        field: Option<&str>,
    ) -> FilterResult<Option<R>> {
        match self {
            Self::Index => index_lookup(spec, conn, field.is_some()),
            Self::Unique => self.filter_one::<R>(spec, conn, field).map(Some),
        }
    }

    /// Like [`Filter::filter`], but absence is `DbError::NoRowFound`.
    pub fn filter_one<R: Record>(
        &self,
        spec: &Specification,
        conn: &Connection,
        field: Option<&str>,
    ) -> FilterResult<R> {
        match self {
            Self::Index => {
                let record = index_lookup::<R>(spec, conn, field.is_some())?;
                record.ok_or(FilterError::Db(DbError::NoRowFound {
                    table: R::TABLE,
                    column: "id",
                }))
            }
            Self::Unique => unique_lookup(spec, conn, field.unwrap_or(DEFAULT_UNIQUE_FIELD)),
        }
    }
}

fn index_lookup<R: Record>(
    spec: &Specification,
    conn: &Connection,
    by_query: bool,
) -> FilterResult<Option<R>> {
    let Some(id) = spec.as_id() else {
        return Err(FilterError::InvalidArgument(format!(
            "index filter requires an id specification, got `{}`",
            spec.kind()
        )));
    };

    let started_at = Instant::now();
    let sql = format!("{} WHERE {} = ?1", R::SELECT_SQL, R::ID_COLUMN);
    let result = if by_query {
        query_first::<R>(conn, &sql, id)
    } else {
        fetch_by_key::<R>(conn, &sql, id)
    };

    match result {
        Ok(record) => {
            info!(
                "event=filter_index module=crud status=ok table={} id={} found={} duration_ms={}",
                R::TABLE,
                id,
                record.is_some(),
                started_at.elapsed().as_millis()
            );
            Ok(record)
        }
        Err(err) => {
            error!(
                "event=filter_index module=crud status=error table={} id={} duration_ms={} error={}",
                R::TABLE,
                id,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn query_first<R: Record>(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<Option<R>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(R::from_row(row)?)),
        None => Ok(None),
    }
}

fn fetch_by_key<R: Record>(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<Option<R>> {
    let mut stmt = conn.prepare_cached(sql)?;
    stmt.query_row([id], |row| R::from_row(row)).optional()
}

fn unique_lookup<R: Record>(
    spec: &Specification,
    conn: &Connection,
    field: &str,
) -> FilterResult<R> {
    let unique_field = UniqueField::parse(field).ok_or_else(|| {
        FilterError::InvalidArgument(format!("invalid field `{field}` specified for filtering"))
    })?;
    let column = R::unique_column(unique_field).ok_or_else(|| {
        FilterError::InvalidArgument(format!(
            "`{}` has no unique column `{unique_field}`",
            R::TABLE
        ))
    })?;
    if !matches!(
        (spec, unique_field),
        (Specification::Username(_), UniqueField::Username)
            | (Specification::Email(_), UniqueField::Email)
    ) {
        return Err(FilterError::InvalidArgument(format!(
            "`{}` specification cannot filter by `{unique_field}`",
            spec.kind()
        )));
    }

    let started_at = Instant::now();
    let sql = format!("{} WHERE {column} = ?1", R::SELECT_SQL);
    match query_exactly_one::<R>(conn, &sql, spec, unique_field) {
        Ok(record) => {
            info!(
                "event=filter_unique module=crud status=ok table={} field={} duration_ms={}",
                R::TABLE,
                unique_field,
                started_at.elapsed().as_millis()
            );
            Ok(record)
        }
        Err(err) => {
            error!(
                "event=filter_unique module=crud status=error table={} field={} duration_ms={} error={}",
                R::TABLE,
                unique_field,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn query_exactly_one<R: Record>(
    conn: &Connection,
    sql: &str,
    spec: &Specification,
    field: UniqueField,
) -> Result<R, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([spec])?;
    let mut matches = Vec::with_capacity(1);
    while let Some(row) = rows.next()? {
        matches.push(R::from_row(row)?);
    }

    let count = matches.len();
    match (matches.pop(), count) {
        (Some(record), 1) => Ok(record),
        (None, _) => Err(DbError::NoRowFound {
            table: R::TABLE,
            column: field.as_str(),
        }),
        (Some(_), count) => Err(DbError::MultipleRowsFound {
            table: R::TABLE,
            column: field.as_str(),
            count,
        }),
    }
}
