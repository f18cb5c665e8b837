//! Traits and functions for initializing the application database and reading
//! domain types out of it.

use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore},
};

/// A type that can set up a SQL table for storing instances of itself.
pub trait CreateTable {
    /// Create a table in the database for the implementing type.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A type that can be built from a database row.
///
/// ```
/// use rusqlite::{Connection, Error, Row};
///
/// use pennybook::db::{CreateTable, MapRow};
///
/// struct Foo {
///     id: i64,
///     desc: String,
/// }
///
/// impl CreateTable for Foo {
///     fn create_table(connection: &Connection) -> Result<(), Error> {
///         connection.execute(
///             "CREATE TABLE foo (id INTEGER PRIMARY KEY, desc TEXT NOT NULL)",
///             (),
///         )?;
///
///         Ok(())
///     }
/// }
///
/// impl MapRow for Foo {
///     type ReturnType = Self;
///
///     fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, Error> {
///         Ok(Self {
///             id: row.get(offset)?,
///             desc: row.get(offset + 1)?,
///         })
///     }
/// }
///
/// fn get_foo(id: i64, connection: &Connection) -> Result<Foo, Error> {
///     connection
///         .prepare("SELECT id, desc FROM foo WHERE id = :id")?
///         .query_row(&[(":id", &id)], Foo::map_row)
/// }
/// ```
pub trait MapRow {
    /// The type that [MapRow::map_row] returns.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// # Errors
    /// Returns an error if a value could not be read from the row, most likely
    /// because of an incorrect column index or type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading columns starting from
    /// `offset`.
    ///
    /// This is useful for tables that were joined on another table.
    ///
    /// # Errors
    /// Returns an error if a value could not be read from the row, most likely
    /// because of an incorrect column index or type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables the application expects in the database.
///
/// Table creation happens in an exclusive transaction, so concurrent calls
/// cannot interleave schema changes.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
