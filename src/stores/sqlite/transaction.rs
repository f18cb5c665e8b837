//! The SQLite implementation of the transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        Amount, CategoryName, DatabaseID, NewTransaction, Transaction, TransactionTitle, UserID,
    },
    stores::{TransactionChanges, TransactionFilter, TransactionStore},
};

/// The columns read when mapping a database row to a [Transaction].
const TRANSACTION_COLUMNS: &str =
    "id, title, date, amount, category, description, transaction_type, user_id, created_at";

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store that uses the given database connection.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create and store a new transaction.
    ///
    /// The creation time is recorded as the current UTC time.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if the user recording the transaction
    /// does not exist.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();

        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO \"transaction\" \
                 (title, date, amount, category, description, transaction_type, user_id, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    new_transaction.title.as_ref(),
                    new_transaction.date,
                    new_transaction.amount.as_f64(),
                    new_transaction.category.as_ref(),
                    &new_transaction.description,
                    new_transaction.transaction_type.as_str(),
                    new_transaction.user_id.as_i64(),
                    created_at,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed, meaning
                // the referenced user does not exist.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 787 =>
                {
                    Error::UserNotFound
                }
                error => error.into(),
            })
    }

    /// Get the transaction with the given `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
                error => error.into(),
            })
    }

    /// Get the transactions recorded by the user `user_id` that match
    /// `filter`, in the order they were recorded.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn get_by_user(
        &self,
        user_id: UserID,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

        if let Some(transaction_type) = filter.transaction_type {
            where_clause_parts.push(format!(
                "transaction_type = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(transaction_type.as_str().to_string()));
        }

        if let Some(date_range) = &filter.date_range {
            // Dates are stored as YYYY-MM-DD strings, so BETWEEN on text gives
            // the correct date ordering.
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        let query_string = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY id ASC",
            where_clause_parts.join(" AND ")
        );

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the fields of the transaction `id` that are set in `changes`
    /// and return the updated transaction.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn update(&mut self, id: DatabaseID, changes: TransactionChanges) -> Result<Transaction, Error> {
        if changes.is_empty() {
            return self.get(id);
        }

        let mut set_clause_parts = vec![];
        let mut query_parameters: Vec<Value> = vec![];

        if let Some(title) = &changes.title {
            set_clause_parts.push(format!("title = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(title.as_ref().to_string()));
        }

        if let Some(date) = changes.date {
            set_clause_parts.push(format!("date = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(date.to_string()));
        }

        if let Some(amount) = changes.amount {
            set_clause_parts.push(format!("amount = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(amount.as_f64()));
        }

        if let Some(category) = &changes.category {
            set_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.as_ref().to_string()));
        }

        if let Some(description) = &changes.description {
            set_clause_parts.push(format!("description = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(description.clone()));
        }

        if let Some(transaction_type) = changes.transaction_type {
            set_clause_parts.push(format!(
                "transaction_type = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(transaction_type.as_str().to_string()));
        }

        let query_string = format!(
            "UPDATE \"transaction\" SET {} WHERE id = ?{} RETURNING {TRANSACTION_COLUMNS}",
            set_clause_parts.join(", "),
            query_parameters.len() + 1
        );
        query_parameters.push(Value::Integer(id));

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_row(params_from_iter(query_parameters.iter()), Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
                error => error.into(),
            })
    }

    /// Remove the transaction with the given `id` from the store.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            Err(Error::TransactionNotFound)
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_title: String = row.get(offset + 1)?;
        let date = row.get(offset + 2)?;
        let amount = Amount::new_unchecked(row.get(offset + 3)?);
        let raw_category: String = row.get(offset + 4)?;
        let description = row.get(offset + 5)?;
        let raw_transaction_type: String = row.get(offset + 6)?;
        let user_id = UserID::new(row.get(offset + 7)?);
        let created_at = row.get(offset + 8)?;

        let transaction_type = raw_transaction_type.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 6,
                rusqlite::types::Type::Text,
                format!("{raw_transaction_type} is not a valid transaction type").into(),
            )
        })?;

        Ok(Transaction::new_unchecked(
            id,
            TransactionTitle::new_unchecked(&raw_title),
            date,
            amount,
            CategoryName::new_unchecked(&raw_category),
            description,
            transaction_type,
            user_id,
            created_at,
        ))
    }
}

#[cfg(test)]
mod transaction_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{
            Amount, CategoryName, NewTransaction, NewUser, PasswordHash, PersonName,
            TransactionTitle, TransactionType, UserID,
        },
        stores::{
            TransactionChanges, TransactionFilter, TransactionStore, UserStore,
            sqlite::SQLiteUserStore,
        },
    };

    use super::SQLiteTransactionStore;

    fn get_stores() -> (SQLiteUserStore, SQLiteTransactionStore) {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        let connection = Arc::new(Mutex::new(connection));

        (
            SQLiteUserStore::new(connection.clone()),
            SQLiteTransactionStore::new(connection.clone()),
        )
    }

    fn create_test_user(user_store: &mut SQLiteUserStore, username: &str) -> UserID {
        user_store
            .create(NewUser {
                username: EmailAddress::from_str(username).unwrap(),
                first_name: PersonName::new_unchecked("Jane"),
                last_name: PersonName::new_unchecked("Doe"),
                password_hash: PasswordHash::new_unchecked(username),
            })
            .expect("Could not create user.")
            .id()
    }

    fn new_transaction(user_id: UserID) -> NewTransaction {
        NewTransaction {
            title: TransactionTitle::new_unchecked("Coffee"),
            date: date!(2024 - 01 - 05),
            amount: Amount::new_unchecked(4.5),
            category: CategoryName::new_unchecked("Food"),
            description: "Morning flat white".to_string(),
            transaction_type: TransactionType::Expense,
            user_id,
        }
    }

    #[test]
    fn create_returns_stored_transaction() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");

        let transaction = store
            .create(new_transaction(user_id))
            .expect("Could not create transaction.");

        assert!(transaction.id() > 0);
        assert_eq!(transaction.title().as_ref(), "Coffee");
        assert_eq!(transaction.date(), &date!(2024 - 01 - 05));
        assert_eq!(transaction.amount().as_f64(), 4.5);
        assert_eq!(transaction.category().as_ref(), "Food");
        assert_eq!(transaction.description(), "Morning flat white");
        assert_eq!(transaction.transaction_type(), TransactionType::Expense);
        assert_eq!(transaction.user_id(), user_id);
    }

    #[test]
    fn create_fails_on_unknown_user() {
        let (_, mut store) = get_stores();

        let result = store.create(new_transaction(UserID::new(999)));

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn get_returns_created_transaction() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");
        let created = store
            .create(new_transaction(user_id))
            .expect("Could not create transaction.");

        let fetched = store.get(created.id()).expect("Could not get transaction.");

        assert_eq!(created, fetched);
    }

    #[test]
    fn get_fails_on_unknown_id() {
        let (_, store) = get_stores();

        assert_eq!(store.get(999), Err(Error::TransactionNotFound));
    }

    #[test]
    fn get_by_user_returns_only_their_transactions() {
        let (mut user_store, mut store) = get_stores();
        let first_user = create_test_user(&mut user_store, "jane@example.com");
        let second_user = create_test_user(&mut user_store, "john@example.com");

        let first = store.create(new_transaction(first_user)).unwrap();
        let second = store.create(new_transaction(first_user)).unwrap();
        store.create(new_transaction(second_user)).unwrap();

        let transactions = store
            .get_by_user(first_user, &TransactionFilter::default())
            .expect("Could not get transactions.");

        assert_eq!(transactions, vec![first, second]);
    }

    #[test]
    fn get_by_user_returns_empty_list_for_user_without_transactions() {
        let (mut user_store, store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");

        let transactions = store
            .get_by_user(user_id, &TransactionFilter::default())
            .expect("Could not get transactions.");

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn get_by_user_filters_by_type() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");

        let expense = store.create(new_transaction(user_id)).unwrap();
        let mut credit = new_transaction(user_id);
        credit.transaction_type = TransactionType::Credit;
        let credit = store.create(credit).unwrap();

        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Expense),
            ..Default::default()
        };
        let transactions = store
            .get_by_user(user_id, &filter)
            .expect("Could not get transactions.");

        assert_eq!(transactions, vec![expense]);

        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Credit),
            ..Default::default()
        };
        let transactions = store
            .get_by_user(user_id, &filter)
            .expect("Could not get transactions.");

        assert_eq!(transactions, vec![credit]);
    }

    #[test]
    fn get_by_user_date_range_includes_both_endpoints() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");

        let mut transactions = vec![];
        for date in [
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 05),
            date!(2024 - 01 - 10),
        ] {
            let mut new_transaction = new_transaction(user_id);
            new_transaction.date = date;
            transactions.push(store.create(new_transaction).unwrap());
        }

        let filter = TransactionFilter {
            date_range: Some(date!(2024 - 01 - 01)..=date!(2024 - 01 - 05)),
            ..Default::default()
        };
        let got = store
            .get_by_user(user_id, &filter)
            .expect("Could not get transactions.");

        assert_eq!(got, transactions[..2]);
    }

    #[test]
    fn get_by_user_applies_type_and_date_filters_together() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");

        let mut wanted = new_transaction(user_id);
        wanted.transaction_type = TransactionType::Credit;
        let wanted = store.create(wanted).unwrap();

        // Same date but the wrong type.
        store.create(new_transaction(user_id)).unwrap();

        // Same type but outside the date range.
        let mut out_of_range = new_transaction(user_id);
        out_of_range.transaction_type = TransactionType::Credit;
        out_of_range.date = date!(2024 - 02 - 01);
        store.create(out_of_range).unwrap();

        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Credit),
            date_range: Some(date!(2024 - 01 - 01)..=date!(2024 - 01 - 31)),
        };
        let got = store
            .get_by_user(user_id, &filter)
            .expect("Could not get transactions.");

        assert_eq!(got, vec![wanted]);
    }

    #[test]
    fn update_overwrites_only_set_fields() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");
        let created = store.create(new_transaction(user_id)).unwrap();

        let changes = TransactionChanges {
            title: Some(TransactionTitle::new_unchecked("Tea")),
            amount: Some(Amount::new_unchecked(3.0)),
            ..Default::default()
        };
        let updated = store
            .update(created.id(), changes)
            .expect("Could not update transaction.");

        assert_eq!(updated.title().as_ref(), "Tea");
        assert_eq!(updated.amount().as_f64(), 3.0);
        assert_eq!(updated.date(), created.date());
        assert_eq!(updated.category(), created.category());
        assert_eq!(updated.description(), created.description());
        assert_eq!(updated.transaction_type(), created.transaction_type());
        assert_eq!(updated.created_at(), created.created_at());

        let fetched = store.get(created.id()).unwrap();
        assert_eq!(updated, fetched);
    }

    #[test]
    fn update_with_empty_changes_returns_unchanged_transaction() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");
        let created = store.create(new_transaction(user_id)).unwrap();

        let updated = store
            .update(created.id(), TransactionChanges::default())
            .expect("Could not update transaction.");

        assert_eq!(created, updated);
    }

    #[test]
    fn update_fails_on_unknown_id() {
        let (_, mut store) = get_stores();

        let changes = TransactionChanges {
            title: Some(TransactionTitle::new_unchecked("Tea")),
            ..Default::default()
        };

        assert_eq!(store.update(999, changes), Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");
        let created = store.create(new_transaction(user_id)).unwrap();

        store
            .delete(created.id())
            .expect("Could not delete transaction.");

        assert_eq!(store.get(created.id()), Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_fails_on_already_deleted_transaction() {
        let (mut user_store, mut store) = get_stores();
        let user_id = create_test_user(&mut user_store, "jane@example.com");
        let created = store.create(new_transaction(user_id)).unwrap();
        store.delete(created.id()).unwrap();

        assert_eq!(store.delete(created.id()), Err(Error::TransactionNotFound));
    }
}
