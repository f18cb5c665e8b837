//! The SQLite implementation of the user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, PasswordHash, PersonName, User, UserID},
    stores::UserStore,
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store that uses the given database connection.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and store a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if the username is taken, or
    /// [Error::DuplicatePasswordHash] if the password hash is not unique.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (username, password, first_name, last_name) VALUES (?1, ?2, ?3, ?4)",
            (
                &new_user.username.to_string(),
                new_user.password_hash.to_string(),
                new_user.first_name.as_ref(),
                new_user.last_name.as_ref(),
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            new_user.username,
            new_user.first_name,
            new_user.last_name,
            new_user.password_hash,
        ))
    }

    /// Get the user with the given `id`.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if no user has the given ID.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, password, first_name, last_name FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
                error => error.into(),
            })
    }

    /// Get the user with the given `username`.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if no user has the given username.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn get_by_username(&self, username: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, password, first_name, last_name FROM user \
                 WHERE username = :username",
            )?
            .query_row(&[(":username", &username.to_string())], Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
                error => error.into(),
            })
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = UserID::new(row.get(offset)?);
        let raw_username: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;
        let raw_first_name: String = row.get(offset + 3)?;
        let raw_last_name: String = row.get(offset + 4)?;

        Ok(User::new(
            id,
            EmailAddress::new_unchecked(raw_username),
            PersonName::new_unchecked(&raw_first_name),
            PersonName::new_unchecked(&raw_last_name),
            PasswordHash::new_unchecked(&raw_password_hash),
        ))
    }
}
