//! Defines the store trait for transactions and the types that narrow down
//! which transactions to fetch or which fields to change.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{
        Amount, CategoryName, DatabaseID, NewTransaction, Transaction, TransactionTitle,
        TransactionType, UserID,
    },
};

/// Handles the creation, retrieval, updating, and deletion of transactions.
pub trait TransactionStore {
    /// Create and store a new transaction.
    ///
    /// # Errors
    /// Returns [Error::UserNotFound] if the user recording the transaction
    /// does not exist.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Get the transaction with the given `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Get the transactions recorded by the user `user_id` that match
    /// `filter`, in the order they were recorded.
    fn get_by_user(
        &self,
        user_id: UserID,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the fields of the transaction `id` that are set in `changes`
    /// and return the updated transaction.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    fn update(&mut self, id: DatabaseID, changes: TransactionChanges) -> Result<Transaction, Error>;

    /// Remove the transaction with the given `id` from the store.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has the given
    /// ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}

/// Defines which transactions [TransactionStore::get_by_user] should return.
///
/// The default filter matches all of a user's transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions dated within this range, including both
    /// endpoints.
    pub date_range: Option<RangeInclusive<Date>>,
}

/// The fields of a transaction that [TransactionStore::update] should
/// overwrite.
///
/// Fields that are `None` keep their stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// The new title.
    pub title: Option<TransactionTitle>,
    /// The new date.
    pub date: Option<Date>,
    /// The new amount.
    pub amount: Option<Amount>,
    /// The new category.
    pub category: Option<CategoryName>,
    /// The new description.
    pub description: Option<String>,
    /// The new transaction type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionChanges {
    /// Whether applying these changes would leave a transaction unchanged.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
