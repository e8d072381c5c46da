//! Generic CRUD repository over one record kind.
//!
//! # Responsibility
//! - Compose a session provider with the index and unique filters.
//! - Translate every storage failure into `DatabaseError`.
//!
//! # Invariants
//! - Each operation acquires its own session and releases it on return.
//! - `create`/`update` return the canonical row re-read after commit.
//! - Passwords reach storage only through the hasher, on create and update.
//! - `update`/`delete` read before they write; the read and the write are not
//!   atomic with respect to concurrent writers.

use crate::crud::filter::{Filter, FilterError};
use crate::crud::record::Record;
use crate::crud::specification::Specification;
use crate::db::{DbError, SessionProvider};
use crate::model::{now_epoch_ms, RecordId};
use crate::security::password::{PasswordError, PasswordHasher};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

pub type RepoResult<T> = Result<T, DatabaseError>;

/// Single repository-layer failure kind.
///
/// Connection loss, constraint violations and missing rows are not
/// distinguished here; callers only get the message and source chain.
#[derive(Debug)]
pub struct DatabaseError {
    message: String,
    source: Option<Cause>,
}

#[derive(Debug)]
enum Cause {
    Filter(FilterError),
    Password(PasswordError),
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for DatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for DatabaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.source.as_ref()? {
            Cause::Filter(err) => Some(err as &(dyn Error + 'static)),
            Cause::Password(err) => Some(err as &(dyn Error + 'static)),
        }
    }
}

impl From<FilterError> for DatabaseError {
    fn from(value: FilterError) -> Self {
        Self {
            message: value.to_string(),
            source: Some(Cause::Filter(value)),
        }
    }
}

impl From<PasswordError> for DatabaseError {
    fn from(value: PasswordError) -> Self {
        Self {
            message: value.to_string(),
            source: Some(Cause::Password(value)),
        }
    }
}

impl From<DbError> for DatabaseError {
    fn from(value: DbError) -> Self {
        FilterError::Db(value).into()
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(value: rusqlite::Error) -> Self {
        DbError::Sqlite(value).into()
    }
}

/// CRUD façade for record kind `R` over session provider `P`.
pub struct Repository<R, P> {
    sessions: P,
    index_filter: Filter,
    unique_filter: Filter,
    hasher: Arc<dyn PasswordHasher>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, P: SessionProvider> Repository<R, P> {
    pub fn new(sessions: P, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            sessions,
            index_filter: Filter::Index,
            unique_filter: Filter::Unique,
            hasher,
            _record: PhantomData,
        }
    }

    /// Password hasher used for patches; shared with services.
    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    /// Reads one record by id. Absence is `Ok(None)`.
    pub fn read_by_id(&self, id: RecordId) -> RepoResult<Option<R>> {
        let session = self.sessions.acquire()?;
        let record = self
            .index_filter
            .filter::<R>(&Specification::id(id), &session, None)?;
        Ok(record)
    }

    /// Reads one page in natural storage order.
    pub fn read_many(&self, offset: u32, limit: NonZeroU32) -> RepoResult<Vec<R>> {
        let started_at = Instant::now();
        let result = self.read_page(offset, limit);
        match &result {
            Ok(records) => info!(
                "event=repo_read_many module=crud status=ok table={} offset={} limit={} rows={} duration_ms={}",
                R::TABLE,
                offset,
                limit,
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=repo_read_many module=crud status=error table={} offset={} limit={} error={}",
                R::TABLE, offset, limit, err
            ),
        }
        result
    }

    /// Seals a draft (hashing any password), inserts it, commits, and returns
    /// the canonical persisted row.
    pub fn create(&self, draft: &R::Draft) -> RepoResult<R> {
        let started_at = Instant::now();
        let id = self.insert_committed(draft).map_err(|err| {
            error!(
                "event=repo_create module=crud status=error table={} error={}",
                R::TABLE,
                err
            );
            err
        })?;

        let created = self.read_by_id(id)?.ok_or_else(|| {
            DatabaseError::new(format!(
                "{} with id {id} missing after create",
                R::LABEL
            ))
        })?;
        info!(
            "event=repo_create module=crud status=ok table={} id={} duration_ms={}",
            R::TABLE,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(created)
    }

    /// Applies `patch` to an existing record, stamps `updated_at`, commits and
    /// returns the canonical row.
    ///
    /// A missing record is a `DatabaseError`, not `Ok(None)`.
    pub fn update(&self, id: RecordId, patch: &R::Patch) -> RepoResult<Option<R>> {
        let started_at = Instant::now();
        let mut record = self.require(id)?;
        record.apply_patch(patch, self.hasher())?;
        record.stamp_updated_at(now_epoch_ms());

        self.write_committed(&record).map_err(|err| {
            error!(
                "event=repo_update module=crud status=error table={} id={} error={}",
                R::TABLE,
                id,
                err
            );
            err
        })?;

        let updated = self.read_by_id(id)?;
        info!(
            "event=repo_update module=crud status=ok table={} id={} duration_ms={}",
            R::TABLE,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    /// Hard-deletes an existing record.
    ///
    /// A missing record is a `DatabaseError`; the delete is rolled back when
    /// storage rejects it.
    pub fn delete(&self, id: RecordId) -> RepoResult<()> {
        let started_at = Instant::now();
        self.require(id)?;

        let mut session = self.sessions.acquire()?;
        let tx = session.transaction()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let outcome = tx.execute(&sql, [id]);
        match outcome {
            Ok(_) => {
                tx.commit()?;
                info!(
                    "event=repo_delete module=crud status=ok table={} id={} duration_ms={}",
                    R::TABLE,
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=repo_delete module=crud status=error table={} id={} error={}",
                    R::TABLE,
                    id,
                    err
                );
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=repo_delete module=crud status=error table={} id={} error_code=rollback_failed error={}",
                        R::TABLE,
                        id,
                        rollback_err
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Runs a unique-field lookup. Zero or several matches are errors.
    pub(crate) fn read_unique(&self, spec: &Specification, field: &str) -> RepoResult<R> {
        let session = self.sessions.acquire()?;
        let record = self
            .unique_filter
            .filter_one::<R>(spec, &session, Some(field))?;
        Ok(record)
    }

    fn require(&self, id: RecordId) -> RepoResult<R> {
        self.read_by_id(id)?.ok_or_else(|| {
            DatabaseError::new(format!(
                "{} with id {id} not found in `{}`",
                R::LABEL,
                R::TABLE
            ))
        })
    }

    fn read_page(&self, offset: u32, limit: NonZeroU32) -> RepoResult<Vec<R>> {
        let session = self.sessions.acquire()?;
        let sql = format!("{} LIMIT ?1 OFFSET ?2", R::SELECT_SQL);
        let mut stmt = session.prepare(&sql)?;
        let mut rows = stmt.query([i64::from(limit.get()), i64::from(offset)])?;
        let mut records = Vec::with_capacity(limit.get().min(256) as usize);
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }

    fn insert_committed(&self, draft: &R::Draft) -> RepoResult<RecordId> {
        let sealed = R::seal_draft(draft, self.hasher())?;
        let mut session = self.sessions.acquire()?;
        let tx = session.transaction()?;
        let id = R::insert(&tx, &sealed)?;
        tx.commit()?;
        Ok(id)
    }

    fn write_committed(&self, record: &R) -> RepoResult<()> {
        let mut session = self.sessions.acquire()?;
        let tx = session.transaction()?;
        let changed = record.write(&tx)?;
        if changed == 0 {
            return Err(DatabaseError::new(format!(
                "{} with id {} disappeared before update",
                R::LABEL,
                record.id()
            )));
        }
        tx.commit()?;
        Ok(())
    }
}
