//! User table mapping and user-only repository lookups.

use crate::crud::record::{Record, UniqueField};
use crate::crud::repository::{RepoResult, Repository};
use crate::crud::specification::Specification;
use crate::db::SessionProvider;
use crate::model::user::{NewUser, User, UserUpdate};
use crate::model::RecordId;
use crate::security::password::{PasswordError, PasswordHasher};
use rusqlite::{params, Connection, Row};
use std::borrow::Cow;

/// Repository for user accounts.
pub type UserRepository<P> = Repository<User, P>;

impl Record for User {
    type Draft = NewUser;
    type Patch = UserUpdate;

    const LABEL: &'static str = "User";
    const TABLE: &'static str = "users";
    const SELECT_SQL: &'static str = "SELECT
    id,
    username,
    email,
    password,
    is_active,
    is_superuser,
    created_at,
    updated_at
FROM users";
    const ID_COLUMN: &'static str = "id";

    fn unique_column(field: UniqueField) -> Option<&'static str> {
        match field {
            UniqueField::Username => Some("username"),
            UniqueField::Email => Some("email"),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password: row.get("password")?,
            is_active: row.get("is_active")?,
            is_superuser: row.get("is_superuser")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn seal_draft<'a>(
        draft: &'a NewUser,
        hasher: &dyn PasswordHasher,
    ) -> Result<Cow<'a, NewUser>, PasswordError> {
        Ok(Cow::Owned(NewUser {
            password: hasher.hash(&draft.password)?,
            ..draft.clone()
        }))
    }

    fn insert(conn: &Connection, draft: &NewUser) -> rusqlite::Result<RecordId> {
        conn.execute(
            "INSERT INTO users (
                username,
                email,
                password,
                is_superuser
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.username.as_str(),
                draft.email.as_str(),
                draft.password.as_str(),
                draft.is_superuser,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE users
             SET
                username = ?1,
                email = ?2,
                password = ?3,
                is_active = ?4,
                is_superuser = ?5,
                updated_at = ?6
             WHERE id = ?7;",
            params![
                self.username.as_str(),
                self.email.as_str(),
                self.password.as_str(),
                self.is_active,
                self.is_superuser,
                self.updated_at,
                self.id,
            ],
        )
    }

    fn apply_patch(
        &mut self,
        patch: &UserUpdate,
        hasher: &dyn PasswordHasher,
    ) -> Result<(), PasswordError> {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(password) = &patch.password {
            self.password = hasher.hash(password)?;
        }
        Ok(())
    }

    fn stamp_updated_at(&mut self, now_epoch_ms: i64) {
        self.updated_at = Some(now_epoch_ms);
    }
}

impl<P: SessionProvider> Repository<User, P> {
    /// Reads the single user with `username`. No match is an error.
    pub fn read_by_username(&self, username: &str) -> RepoResult<User> {
        self.read_unique(&Specification::username(username), "username")
    }

    /// Reads the single user with `email`. No match is an error.
    pub fn read_by_email(&self, email: &str) -> RepoResult<User> {
        self.read_unique(&Specification::email(email), "email")
    }

    /// Resolves the id of the user registered with `email`.
    pub fn read_id_by_email(&self, email: &str) -> RepoResult<RecordId> {
        self.read_by_email(email).map(|user| user.id)
    }
}
