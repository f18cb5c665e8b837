//! The response bodies shared by the API's route handlers.
//!
//! The sign up and sign in endpoints name their message field `msg`, the
//! transaction endpoints name theirs `message`. Clients depend on both names.

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// The response body for successful sign up and sign in requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable description of the outcome.
    pub msg: String,
    /// The token the client should send with requests that require
    /// authentication.
    pub token: String,
}

/// The response body for requests that create or update a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable description of the outcome.
    pub message: String,
    /// The transaction as stored, including its assigned ID.
    pub transaction: Transaction,
}

/// The response body for listing transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The transactions that matched the request's filters.
    pub transactions: Vec<Transaction>,
}

/// The response body for requests that return only a status message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable description of the outcome.
    pub message: String,
}
