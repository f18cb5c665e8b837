//! This file defines a user of the application and the types used to validate
//! the details they sign up with.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{Error, models::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This disambiguates user IDs from other integer IDs, leading to clearer
/// compile errors when an ID of the wrong kind is passed around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The user ID as a plain integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The maximum number of characters a person's name may have.
pub const MAX_NAME_LENGTH: usize = 50;

/// A person's first or last name.
///
/// Leading and trailing whitespace is trimmed on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    /// Create and validate a name.
    ///
    /// # Errors
    /// Returns [Error::EmptyName] if `name` is empty after trimming
    /// whitespace, or [Error::NameTooLong] if the trimmed name has more than
    /// [MAX_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            Err(Error::EmptyName)
        } else if trimmed.chars().count() > MAX_NAME_LENGTH {
            Err(Error::NameTooLong)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Create a name without validating it.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid name is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The minimum number of characters a username may have.
pub const MIN_USERNAME_LENGTH: usize = 6;

/// The maximum number of characters a username may have.
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Parse and validate a username.
///
/// A username must be a well formed email address between
/// [MIN_USERNAME_LENGTH] and [MAX_USERNAME_LENGTH] characters.
///
/// # Errors
/// Returns [Error::InvalidUsernameLength] if `username` is too short or too
/// long, or [Error::InvalidUsername] if it is not a well formed email address.
pub fn parse_username(username: &str) -> Result<EmailAddress, Error> {
    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH || length > MAX_USERNAME_LENGTH {
        return Err(Error::InvalidUsernameLength);
    }

    EmailAddress::from_str(username).map_err(|_| Error::InvalidUsername(username.to_string()))
}

/// A user of the application.
///
/// A user must sign in to use the transaction endpoints, and owns the
/// transactions they record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    username: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
    password_hash: PasswordHash,
}

impl User {
    /// Create a new user.
    ///
    /// Does **not** add the user to any database, this must be done by the
    /// caller through a user store.
    pub fn new(
        id: UserID,
        username: EmailAddress,
        first_name: PersonName,
        last_name: PersonName,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username,
            first_name,
            last_name,
            password_hash,
        }
    }

    /// The ID of the user.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The username the user signs in with.
    pub fn username(&self) -> &EmailAddress {
        &self.username
    }

    /// The user's first name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// The user's last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// The hash of the user's password.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The details needed to create a new [User].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// The username the user will sign in with.
    pub username: EmailAddress,
    /// The user's first name.
    pub first_name: PersonName,
    /// The user's last name.
    pub last_name: PersonName,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
}
