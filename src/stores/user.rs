//! Defines the store trait for users of the application.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create and store a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if a user with the same username
    /// already exists.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Get the user with the given `id`.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if no user has the given ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user with the given `username`.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if no user has the given username.
    fn get_by_username(&self, username: &EmailAddress) -> Result<User, Error>;
}
