//! This file defines the types that handle password validation and hashing.
//! [RawPassword] wraps a password string and enforces the minimum length rule.
//! [PasswordHash] converts a [RawPassword] into a salted and hashed password
//! that is safe to store.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum number of characters a password must have.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// A password that meets the application's password rules but has not been
/// hashed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPassword(String);

impl RawPassword {
    /// Create and validate a password from a string.
    ///
    /// # Errors
    /// Returns [Error::PasswordTooShort] if `raw_password` has fewer than
    /// [MIN_PASSWORD_LENGTH] characters.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        if raw_password.chars().count() < MIN_PASSWORD_LENGTH {
            Err(Error::PasswordTooShort)
        } else {
            Ok(Self(raw_password.to_string()))
        }
    }

    /// Create a password without validating it.
    ///
    /// The caller must ensure that `raw_password` meets the password rules.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid password is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_string())
    }
}

impl AsRef<str> for RawPassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for RawPassword {
    /// Writes a fixed number of asterisks instead of the password.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A password that has been hashed with bcrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The default cost used to hash passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with the given bcrypt `cost`.
    ///
    /// Use [PasswordHash::DEFAULT_COST] unless there is a specific reason not
    /// to, such as speeding up tests.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the password could not be hashed.
    pub fn new(password: RawPassword, cost: u32) -> Result<Self, Error> {
        hash(password.as_ref(), cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Create a password hash from a string that is already a bcrypt hash.
    ///
    /// The caller must ensure that `hash` is a valid bcrypt hash, for example
    /// one read back from the application database.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid hash is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_string())
    }

    /// Check whether `raw_password` matches this hash.
    ///
    /// # Errors
    /// Returns a [BcryptError] if the stored hash could not be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod password_hash_tests {
    use super::{PasswordHash, RawPassword};

    #[test]
    fn verify_accepts_correct_password() {
        let hash = PasswordHash::new(RawPassword::new_unchecked("okon"), 4)
            .expect("Could not hash password.");

        assert!(hash.verify("okon").unwrap());
    }

    #[test]
    fn verify_rejects_incorrect_password() {
        let hash = PasswordHash::new(RawPassword::new_unchecked("okon"), 4)
            .expect("Could not hash password.");

        assert!(!hash.verify("thisisnotthepassword").unwrap());
    }

    #[test]
    fn verify_accepts_precomputed_hash() {
        // A bcrypt hash of the password "okon".
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert!(hash.verify("okon").unwrap());
    }

    #[test]
    fn hashing_same_password_twice_gives_different_hashes() {
        let first = PasswordHash::new(RawPassword::new_unchecked("okon"), 4).unwrap();
        let second = PasswordHash::new(RawPassword::new_unchecked("okon"), 4).unwrap();

        assert_ne!(first, second);
    }
}
