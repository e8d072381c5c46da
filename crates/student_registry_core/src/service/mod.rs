//! Business-facing services over the repositories.
//!
//! # Responsibility
//! - Convert repository `DatabaseError` into `ServiceError::Failed`.
//! - Turn read-by-id absence into `ServiceError::NotFound`.
//! - Project records into response shapes.
//!
//! # Invariants
//! - Services never touch sessions or SQL directly.
//! - Nothing is retried; every failure reaches the caller immediately.

pub mod record_service;
pub mod user_service;
