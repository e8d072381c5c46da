//! Specification/filter-based data access layer.
//!
//! # Responsibility
//! - Describe lookups as typed specifications (`Specification`).
//! - Execute single-record lookups through a fixed set of strategies (`Filter`).
//! - Provide per-record-kind CRUD repositories over scoped sessions.
//!
//! # Invariants
//! - Filters are stateless and answer single-record predicate queries only.
//! - Repositories acquire one session per operation and release it on every
//!   exit path.
//! - Every repository failure surfaces as `DatabaseError`; absence on reads is
//!   `Ok(None)`, never an error.

pub mod filter;
pub mod record;
pub mod repository;
pub mod specification;
pub mod student_repo;
pub mod user_repo;
