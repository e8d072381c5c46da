//! Credential handling used by repositories and services.

pub mod password;
