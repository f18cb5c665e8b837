//! The route handler for updating an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{Amount, CategoryName, DatabaseID, TransactionTitle, parse_transaction_date},
    routes::responses::TransactionResponse,
    stores::{TransactionChanges, TransactionStore, UserStore},
};

/// The request body for updating a transaction.
///
/// Fields that are omitted keep their stored values.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionBody {
    /// The new title.
    pub title: Option<String>,
    /// The new date, in the format YYYY-MM-DD.
    pub date: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new description.
    pub description: Option<String>,
    /// The new transaction type, either "Expense" or "Credit".
    pub transaction_type: Option<String>,
}

/// A route handler for updating the transaction with the ID given in the
/// path.
///
/// Only the fields present in the request body are overwritten.
///
/// # Errors
/// Returns [Error::InvalidFields] if a present field fails validation,
/// [Error::TransactionNotFound] if no transaction has the given ID, or
/// [Error::Forbidden] if the transaction belongs to another user.
pub async fn update_transaction<U, T>(
    State(mut state): State<AppState<U, T>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(body): Json<UpdateTransactionBody>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let changes = validate_changes(&body)?;

    let transaction = state.transaction_store.get(transaction_id)?;

    if transaction.user_id() != claims.user_id {
        return Err(Error::Forbidden);
    }

    let transaction = state.transaction_store.update(transaction_id, changes)?;

    Ok((
        StatusCode::OK,
        Json(TransactionResponse {
            success: true,
            message: "Transaction updated".to_string(),
            transaction,
        }),
    )
        .into_response())
}

/// Validate the fields present in an update request, collecting the error
/// messages of every field that failed.
fn validate_changes(body: &UpdateTransactionBody) -> Result<TransactionChanges, Error> {
    let mut errors = vec![];
    let mut changes = TransactionChanges::default();

    if let Some(title) = &body.title {
        match TransactionTitle::new(title) {
            Ok(title) => changes.title = Some(title),
            Err(error) => errors.push(error.to_string()),
        }
    }

    if let Some(date) = &body.date {
        match parse_transaction_date(date) {
            Ok(date) => changes.date = Some(date),
            Err(error) => errors.push(error.to_string()),
        }
    }

    if let Some(amount) = body.amount {
        match Amount::new(amount) {
            Ok(amount) => changes.amount = Some(amount),
            Err(error) => errors.push(error.to_string()),
        }
    }

    if let Some(category) = &body.category {
        match CategoryName::new(category) {
            Ok(category) => changes.category = Some(category),
            Err(error) => errors.push(error.to_string()),
        }
    }

    if let Some(description) = &body.description {
        if description.is_empty() {
            errors.push(Error::EmptyDescription.to_string());
        } else {
            changes.description = Some(description.clone());
        }
    }

    if let Some(transaction_type) = &body.transaction_type {
        match transaction_type.parse() {
            Ok(transaction_type) => changes.transaction_type = Some(transaction_type),
            Err(error) => errors.push(error.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(Error::InvalidFields(errors))
    }
}
