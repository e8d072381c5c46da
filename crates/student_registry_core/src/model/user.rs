//! User account record and its request/response shapes.

use super::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Persisted user account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    /// Unique login name, 4..=15 chars.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    /// Hashed password. Never the plaintext.
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    /// Epoch ms, assigned by storage on insert.
    pub created_at: i64,
    /// Epoch ms of the last update, `None` until first updated.
    pub updated_at: Option<i64>,
}

/// Create request for a user account.
///
/// `password` holds whatever the caller wants stored; `UserService::register`
/// hashes it before it reaches the repository.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_superuser: bool,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            is_superuser: false,
        }
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_superuser", &self.is_superuser)
            .finish()
    }
}

/// Partial update for a user. Absent fields keep their stored value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    /// New plaintext password, re-hashed before it is stored.
    pub password: Option<String>,
}

impl Debug for UserUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Public projection of a user. Omits the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Projection returned after an update; carries the new password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdateResponse {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<&User> for UserUpdateResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserUpdate};

    #[test]
    fn debug_output_redacts_passwords() {
        let draft = NewUser::new("yuno123", "yuno@mail.com", "Password1.");
        let rendered = format!("{draft:?}");
        assert!(!rendered.contains("Password1."));
        assert!(rendered.contains("yuno123"));

        let patch = UserUpdate {
            password: Some("Secret99!".to_string()),
            ..UserUpdate::default()
        };
        assert!(!format!("{patch:?}").contains("Secret99!"));
    }

    #[test]
    fn update_patch_deserializes_missing_fields_as_absent() {
        let patch: UserUpdate = serde_json::from_str(r#"{"email":"new@mail.com"}"#).unwrap();
        assert_eq!(patch.email.as_deref(), Some("new@mail.com"));
        assert!(patch.username.is_none());
        assert!(patch.password.is_none());
    }
}
