//! This file defines a transaction, which records an expense or income event,
//! and the types used to validate its fields.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The maximum number of characters a transaction title may have.
pub const MAX_TITLE_LENGTH: usize = 15;

/// The maximum number of characters a category name may have.
pub const MAX_CATEGORY_LENGTH: usize = 10;

/// The date format accepted for transactions, e.g., "2024-01-05".
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a transaction date string in the format YYYY-MM-DD.
///
/// # Errors
/// Returns [Error::InvalidDate] if `date` does not match the format or is not
/// a valid calendar date.
pub fn parse_transaction_date(date: &str) -> Result<Date, Error> {
    Date::parse(date, DATE_FORMAT).map_err(|_| Error::InvalidDate(date.to_string()))
}

/// A short label summarising a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTitle(String);

impl TransactionTitle {
    /// Create and validate a transaction title.
    ///
    /// # Errors
    /// Returns [Error::EmptyTitle] if `title` is empty, or
    /// [Error::TitleTooLong] if it has more than [MAX_TITLE_LENGTH]
    /// characters.
    pub fn new(title: &str) -> Result<Self, Error> {
        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            Err(Error::TitleTooLong)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a title without validating it.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid title is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for TransactionTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a category that groups related transactions, e.g., "Food".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create and validate a category name.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategory] if `name` is empty, or
    /// [Error::CategoryTooLong] if it has more than [MAX_CATEGORY_LENGTH]
    /// characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyCategory)
        } else if name.chars().count() > MAX_CATEGORY_LENGTH {
            Err(Error::CategoryTooLong)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validating it.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid name is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount, which must be a positive, finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Create and validate an amount.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `amount` is zero, negative, NaN,
    /// or infinite.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::NonPositiveAmount)
        }
    }

    /// Create an amount without validating it.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid amount is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The amount as a plain float.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a transaction takes money out of or puts money into a user's
/// pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money spent by the user.
    Expense,
    /// Money received by the user.
    Credit,
}

impl TransactionType {
    /// The transaction type as the string used in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Credit => "Credit",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Expense" => Ok(TransactionType::Expense),
            "Credit" => Ok(TransactionType::Credit),
            _ => Err(Error::InvalidTransactionType(value.to_string())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income event recorded by a user.
///
/// To create a transaction, pass a [NewTransaction](crate::models::NewTransaction)
/// to a transaction store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: DatabaseID,
    title: TransactionTitle,
    date: Date,
    amount: Amount,
    category: CategoryName,
    description: String,
    transaction_type: TransactionType,
    user_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction from its stored parts.
    ///
    /// This function is intended for rows coming out of the application
    /// database, so the fields are not re-validated.
    pub fn new_unchecked(
        id: DatabaseID,
        title: TransactionTitle,
        date: Date,
        amount: Amount,
        category: CategoryName,
        description: String,
        transaction_type: TransactionType,
        user_id: UserID,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            title,
            date,
            amount,
            category,
            description,
            transaction_type,
            user_id,
            created_at,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// A short label summarising the transaction.
    pub fn title(&self) -> &TransactionTitle {
        &self.title
    }

    /// The date the transaction occurred.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// The amount of money spent or received.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The category the transaction belongs to.
    pub fn category(&self) -> &CategoryName {
        &self.category
    }

    /// A free form note about the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the transaction is an expense or a credit.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The ID of the user that recorded the transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// When the transaction was recorded.
    pub fn created_at(&self) -> &OffsetDateTime {
        &self.created_at
    }
}

/// The details needed to record a new [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short label summarising the transaction.
    pub title: TransactionTitle,
    /// The date the transaction occurred.
    pub date: Date,
    /// The amount of money spent or received.
    pub amount: Amount,
    /// The category the transaction belongs to.
    pub category: CategoryName,
    /// A free form note about the transaction.
    pub description: String,
    /// Whether the transaction is an expense or a credit.
    pub transaction_type: TransactionType,
    /// The ID of the user recording the transaction.
    pub user_id: UserID,
}

#[cfg(test)]
mod title_tests {
    use crate::Error;

    use super::{MAX_TITLE_LENGTH, TransactionTitle};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(TransactionTitle::new(""), Err(Error::EmptyTitle));
    }

    #[test]
    fn new_fails_on_too_long_title() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);

        assert_eq!(TransactionTitle::new(&title), Err(Error::TitleTooLong));
    }

    #[test]
    fn new_succeeds_on_max_length_title() {
        let title = "a".repeat(MAX_TITLE_LENGTH);

        assert!(TransactionTitle::new(&title).is_ok());
    }
}

#[cfg(test)]
mod category_tests {
    use crate::Error;

    use super::{CategoryName, MAX_CATEGORY_LENGTH};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategory));
    }

    #[test]
    fn new_fails_on_too_long_name() {
        let name = "a".repeat(MAX_CATEGORY_LENGTH + 1);

        assert_eq!(CategoryName::new(&name), Err(Error::CategoryTooLong));
    }

    #[test]
    fn new_succeeds_on_max_length_name() {
        let name = "a".repeat(MAX_CATEGORY_LENGTH);

        assert!(CategoryName::new(&name).is_ok());
    }
}

#[cfg(test)]
mod amount_tests {
    use crate::Error;

    use super::Amount;

    #[test]
    fn new_fails_on_zero() {
        assert_eq!(Amount::new(0.0), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        assert_eq!(Amount::new(-5.0), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_fails_on_nan() {
        assert_eq!(Amount::new(f64::NAN), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_fails_on_infinity() {
        assert_eq!(Amount::new(f64::INFINITY), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_succeeds_on_positive_amount() {
        let amount = Amount::new(4.5).expect("Could not create amount.");

        assert_eq!(amount.as_f64(), 4.5);
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parses_expense() {
        assert_eq!("Expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn parses_credit() {
        assert_eq!("Credit".parse(), Ok(TransactionType::Credit));
    }

    #[test]
    fn rejects_other_strings() {
        assert_eq!(
            "Transfer".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("Transfer".to_string()))
        );
    }

    #[test]
    fn rejects_lowercase_variants() {
        assert!("expense".parse::<TransactionType>().is_err());
    }
}
