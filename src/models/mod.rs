//! This module defines the domain data types and their validation rules.

pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, RawPassword};
pub use transaction::{
    Amount, CategoryName, MAX_CATEGORY_LENGTH, MAX_TITLE_LENGTH, NewTransaction, Transaction,
    TransactionTitle, TransactionType, parse_transaction_date,
};
pub use user::{
    MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH, NewUser, PersonName, User, UserID,
    parse_username,
};

mod password;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
