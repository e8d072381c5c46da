//! Core of the student registration backend.
//!
//! Layers, leaf to root: `crud::specification` → `crud::filter` →
//! `crud::repository` → `service`. Sessions come from `db`; outer surfaces
//! (the CLI, an HTTP layer) only talk to services.

pub mod config;
pub mod crud;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod security;
pub mod service;

pub use config::{ConfigError, RegistryConfig};
pub use crud::filter::{Filter, FilterError, FilterResult};
pub use crud::record::{Record, UniqueField};
pub use crud::repository::{DatabaseError, RepoResult, Repository};
pub use crud::specification::Specification;
pub use crud::student_repo::StudentRepository;
pub use crud::user_repo::UserRepository;
pub use db::{Database, DbError, DbResult, Session, SessionProvider};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::affinity::{Grimoire, MagicAffinity};
pub use model::student::{
    NewStudent, Student, StudentCreateResponse, StudentResponse, StudentUpdate,
};
pub use model::user::{NewUser, User, UserResponse, UserUpdate, UserUpdateResponse};
pub use model::{now_epoch_ms, to_response, RecordId};
pub use notify::{dispatch_welcome, LogNotifier, NotifyError, WelcomeNotifier};
pub use security::password::{
    BcryptPasswordHasher, PasswordError, PasswordHasher, DEFAULT_BCRYPT_COST,
};
pub use service::record_service::{
    DeleteReceipt, Projected, RecordService, ServiceError, ServiceResult, StudentService,
};
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
