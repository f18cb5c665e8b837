//! Implements the store traits with SQLite as the backing database.

pub mod transaction;
pub mod user;

pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteUserStore, SQLiteTransactionStore>;

/// Create an app state that uses SQLite stores backed by `db_connection`.
///
/// This also sets up the tables the application expects in the database.
///
/// # Errors
/// Returns an error if the database could not be initialized.
pub fn create_app_state(db_connection: Connection, jwt_secret: &str) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let user_store = SQLiteUserStore::new(connection.clone());
    let transaction_store = SQLiteTransactionStore::new(connection.clone());

    Ok(AppState::new(jwt_secret, user_store, transaction_store))
}
