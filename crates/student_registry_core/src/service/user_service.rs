//! User-specific service operations.

use crate::db::SessionProvider;
use crate::model::user::{NewUser, User, UserResponse};
use crate::model::RecordId;
use crate::service::record_service::{RecordService, ServiceResult};
use log::info;

/// User service over any session provider.
pub type UserService<P> = RecordService<User, P>;

impl<P: SessionProvider> RecordService<User, P> {
    /// Registers a user. The plaintext password is hashed by the repository
    /// before it is stored, as on every user create path.
    pub fn register(&self, draft: &NewUser) -> ServiceResult<UserResponse> {
        let registered = self.create(draft)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            registered.id
        );
        Ok(registered)
    }

    /// Returns the raw record, hash included, for credential checks.
    pub fn get_login_user(&self, username: &str) -> ServiceResult<User> {
        Ok(self.repository().read_by_username(username)?)
    }

    pub fn get_by_username(&self, username: &str) -> ServiceResult<UserResponse> {
        let user = self.get_login_user(username)?;
        Ok(UserResponse::from(&user))
    }

    pub fn get_id_by_email(&self, email: &str) -> ServiceResult<RecordId> {
        Ok(self.repository().read_id_by_email(email)?)
    }

    /// Checks credentials. `Ok(None)` when the password does not match or the
    /// account is inactive; an unknown username is an error.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ServiceResult<Option<UserResponse>> {
        let user = self.get_login_user(username)?;
        let accepted =
            user.is_active && self.repository().hasher().verify(password, &user.password);
        info!(
            "event=user_authenticate module=service status={} user_id={}",
            if accepted { "ok" } else { "rejected" },
            user.id
        );
        Ok(accepted.then(|| UserResponse::from(&user)))
    }
}
