//! Student application record and its request/response shapes.

use super::affinity::{Grimoire, MagicAffinity};
use super::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the generated student identification code.
pub const IDENTIFICATION_LEN: usize = 10;

/// Persisted student row, joined with the owning user's public fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    /// Owning user account.
    pub user_id: RecordId,
    /// Read from the owning user; not writable through student updates.
    pub username: String,
    /// Read from the owning user; not writable through student updates.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique code generated on create.
    pub identification: String,
    /// 1..=99, enforced by storage.
    pub age: u32,
    pub magic_affinity: MagicAffinity,
    pub grimoire_cover: Grimoire,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Create request for a student application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewStudent {
    pub user_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub magic_affinity: MagicAffinity,
    pub grimoire_cover: Grimoire,
}

impl NewStudent {
    pub fn new(
        user_id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: u32,
        grimoire_cover: Grimoire,
    ) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            magic_affinity: MagicAffinity::default(),
            grimoire_cover,
        }
    }
}

/// Partial update for a student. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub magic_affinity: Option<MagicAffinity>,
    pub grimoire_cover: Option<Grimoire>,
    pub is_active: Option<bool>,
}

/// Full public projection of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentResponse {
    pub id: RecordId,
    pub user_id: RecordId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub identification: String,
    pub age: u32,
    pub magic_affinity: MagicAffinity,
    pub grimoire_cover: Grimoire,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<&Student> for StudentResponse {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            user_id: student.user_id,
            username: student.username.clone(),
            email: student.email.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            identification: student.identification.clone(),
            age: student.age,
            magic_affinity: student.magic_affinity,
            grimoire_cover: student.grimoire_cover,
            is_active: student.is_active,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Short projection returned to the registrant after create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentCreateResponse {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Student> for StudentCreateResponse {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            username: student.username.clone(),
            email: student.email.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
        }
    }
}

/// Generates a fresh identification code of uppercase hex characters.
pub fn generate_identification() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_ascii_uppercase()
        .chars()
        .take(IDENTIFICATION_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_identification, IDENTIFICATION_LEN};

    #[test]
    fn identification_is_fixed_length_uppercase() {
        let code = generate_identification();
        assert_eq!(code.len(), IDENTIFICATION_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
