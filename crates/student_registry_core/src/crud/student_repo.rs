//! Student table mapping.
//!
//! Student rows are read joined with their owning user so that responses can
//! carry the owner's username and email.

use crate::crud::record::{Record, UniqueField};
use crate::crud::repository::Repository;
use crate::model::student::{generate_identification, NewStudent, Student, StudentUpdate};
use crate::model::RecordId;
use crate::security::password::{PasswordError, PasswordHasher};
use rusqlite::{params, Connection, Row};
use std::borrow::Cow;

/// Repository for student applications.
pub type StudentRepository<P> = Repository<Student, P>;

impl Record for Student {
    type Draft = NewStudent;
    type Patch = StudentUpdate;

    const LABEL: &'static str = "Student";
    const TABLE: &'static str = "students";
    const SELECT_SQL: &'static str = "SELECT
    s.id AS id,
    s.user_id AS user_id,
    u.username AS username,
    u.email AS email,
    s.first_name AS first_name,
    s.last_name AS last_name,
    s.identification AS identification,
    s.age AS age,
    s.magic_affinity AS magic_affinity,
    s.grimoire_cover AS grimoire_cover,
    s.is_active AS is_active,
    s.created_at AS created_at,
    s.updated_at AS updated_at
FROM students s
INNER JOIN users u ON u.id = s.user_id";
    const ID_COLUMN: &'static str = "s.id";

    fn unique_column(_field: UniqueField) -> Option<&'static str> {
        None
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            identification: row.get("identification")?,
            age: row.get("age")?,
            magic_affinity: row.get("magic_affinity")?,
            grimoire_cover: row.get("grimoire_cover")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn seal_draft<'a>(
        draft: &'a NewStudent,
        _hasher: &dyn PasswordHasher,
    ) -> Result<Cow<'a, NewStudent>, PasswordError> {
        Ok(Cow::Borrowed(draft))
    }

    fn insert(conn: &Connection, draft: &NewStudent) -> rusqlite::Result<RecordId> {
        conn.execute(
            "INSERT INTO students (
                user_id,
                first_name,
                last_name,
                identification,
                age,
                magic_affinity,
                grimoire_cover
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                draft.user_id,
                draft.first_name.as_str(),
                draft.last_name.as_str(),
                generate_identification(),
                draft.age,
                draft.magic_affinity,
                draft.grimoire_cover,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE students
             SET
                first_name = ?1,
                last_name = ?2,
                age = ?3,
                magic_affinity = ?4,
                grimoire_cover = ?5,
                is_active = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.age,
                self.magic_affinity,
                self.grimoire_cover,
                self.is_active,
                self.updated_at,
                self.id,
            ],
        )
    }

    fn apply_patch(
        &mut self,
        patch: &StudentUpdate,
        _hasher: &dyn PasswordHasher,
    ) -> Result<(), PasswordError> {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(magic_affinity) = patch.magic_affinity {
            self.magic_affinity = magic_affinity;
        }
        if let Some(grimoire_cover) = patch.grimoire_cover {
            self.grimoire_cover = grimoire_cover;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    fn stamp_updated_at(&mut self, now_epoch_ms: i64) {
        self.updated_at = Some(now_epoch_ms);
    }
}
