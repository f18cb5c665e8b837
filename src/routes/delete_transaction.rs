//! The route handler for deleting an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::Claims,
    models::DatabaseID,
    routes::responses::MessageResponse,
    stores::{TransactionStore, UserStore},
};

/// A route handler for deleting the transaction with the ID given in the
/// path.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if no transaction has the given ID,
/// or [Error::Forbidden] if the transaction belongs to another user.
pub async fn delete_transaction<U, T>(
    State(mut state): State<AppState<U, T>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let transaction = state.transaction_store.get(transaction_id)?;

    if transaction.user_id() != claims.user_id {
        return Err(Error::Forbidden);
    }

    state.transaction_store.delete(transaction_id)?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: "Transaction deleted successfully".to_string(),
        }),
    )
        .into_response())
}
