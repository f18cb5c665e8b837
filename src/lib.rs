//! Pennybook is a web app for tracking personal income and expenses.
//!
//! This library provides a REST API that serves JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod logging;

pub mod auth;
pub mod db;
pub mod models;
pub mod routes;
pub mod stores;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more request fields failed validation.
    ///
    /// Holds the message for each field that failed.
    #[error("invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    /// An empty string was used to create a transaction title.
    #[error("the title must not be empty")]
    EmptyTitle,

    /// The title used to create a transaction was too long.
    #[error("the title must be at most 15 characters")]
    TitleTooLong,

    /// A date string could not be parsed as a calendar date.
    #[error("{0} is not a valid date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A zero, negative, or non-finite amount was used to create a transaction.
    #[error("the amount must be a number greater than zero")]
    NonPositiveAmount,

    /// An empty string was used to create a category name.
    #[error("the category must not be empty")]
    EmptyCategory,

    /// The category name used to create a transaction was too long.
    #[error("the category must be at most 10 characters")]
    CategoryTooLong,

    /// An empty string was used as a transaction description.
    #[error("the description must not be empty")]
    EmptyDescription,

    /// A string other than "Expense" or "Credit" was used as a transaction type.
    #[error("{0} is not a valid transaction type, expected Expense or Credit")]
    InvalidTransactionType(String),

    /// An empty string was used to create a person's name.
    #[error("the name must not be empty")]
    EmptyName,

    /// The name used to create a user was too long.
    #[error("the name must be at most 50 characters")]
    NameTooLong,

    /// The username is not a well formed email address.
    #[error("{0} is not a valid email address")]
    InvalidUsername(String),

    /// The username is too short or too long.
    #[error("the username must be between 6 and 30 characters")]
    InvalidUsernameLength,

    /// The password is too short.
    #[error("the password must be at least 5 characters")]
    PasswordTooShort,

    /// The user provided an invalid combination of username and password.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The request had no bearer token in its Authorization header.
    #[error("no bearer token was provided")]
    MissingToken,

    /// The bearer token is malformed, has an invalid signature, or has expired.
    #[error("the token is invalid or expired")]
    InvalidToken,

    /// An unexpected error occurred while signing a token.
    #[error("could not create an auth token")]
    TokenCreation,

    /// The username used to create a user is already registered.
    #[error("the username is already in use")]
    DuplicateUsername,

    /// The password hash already exists in the database. The client should hash the password again.
    #[error("the password hash is not unique")]
    DuplicatePasswordHash,

    /// There was no user in the database that matched the given details.
    #[error("no user found with the given details")]
    UserNotFound,

    /// There was no transaction in the database that matched the given details.
    #[error("no transaction found with the given details")]
    TransactionNotFound,

    /// The transaction belongs to another user.
    #[error("the transaction belongs to another user")]
    Forbidden,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.password") =>
            {
                Error::DuplicatePasswordHash
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::InvalidFields(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": "Invalid inputs, please enter valid information",
                    "errors": errors,
                }),
            ),
            error @ (Error::EmptyTitle
            | Error::TitleTooLong
            | Error::InvalidDate(_)
            | Error::NonPositiveAmount
            | Error::EmptyCategory
            | Error::CategoryTooLong
            | Error::EmptyDescription
            | Error::InvalidTransactionType(_)
            | Error::EmptyName
            | Error::NameTooLong
            | Error::InvalidUsername(_)
            | Error::InvalidUsernameLength
            | Error::PasswordTooShort) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "message": error.to_string()}),
            ),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "message": "Incorrect username or password"}),
            ),
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "message": "Access denied. No token provided."}),
            ),
            Error::InvalidToken => (
                StatusCode::FORBIDDEN,
                json!({"success": false, "message": "Invalid or expired token."}),
            ),
            Error::DuplicateUsername => (
                StatusCode::CONFLICT,
                json!({"success": false, "message": "User already exists, please log in"}),
            ),
            Error::UserNotFound => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "message": "User not found"}),
            ),
            Error::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "message": "Transaction not found"}),
            ),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({
                    "success": false,
                    "message": "You do not have permission to modify this transaction",
                }),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"success": false, "message": "Internal server error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
