//! Password hashing collaborator.
//!
//! # Invariants
//! - Stored hashes never equal the plaintext they were derived from.
//! - Two hashes of the same plaintext differ (per-hash random salt).
//! - Encoded hashes fit the 100-char `users.password` column.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Work factor used by [`BcryptPasswordHasher::new`].
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug)]
pub enum PasswordError {
    /// The hashing backend rejected the input or the work factor.
    Hash(bcrypt::BcryptError),
}

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl Error for PasswordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Hash(err) => Some(err),
        }
    }
}

impl From<bcrypt::BcryptError> for PasswordError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hash(value)
    }
}

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    /// Returns the encoded hash of `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Checks `plaintext` against an encoded hash produced by [`Self::hash`].
    /// Malformed hashes never verify.
    fn verify(&self, plaintext: &str, hashed: &str) -> bool;
}

/// bcrypt hasher producing modular-crypt strings (`$2b$<cost>$...`, 60 chars).
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_BCRYPT_COST)
    }

    /// Hasher with an explicit work factor (4..=31). Low costs are for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        bcrypt::verify(plaintext, hashed).unwrap_or(false)
    }
}
