//! This module defines the REST API's routes and their handlers.

pub mod endpoints;
pub mod responses;

mod delete_transaction;
mod sign_in;
mod sign_up;
mod transactions;
mod update_transaction;

pub use delete_transaction::delete_transaction;
pub use sign_in::sign_in;
pub use sign_up::sign_up;
pub use transactions::{add_transaction, get_transactions};
pub use update_transaction::update_transaction;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    stores::{TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
pub fn build_router<U, T>(state: AppState<U, T>) -> Router
where
    U: UserStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::SIGN_IN, post(sign_in))
        .route(endpoints::ADD_TRANSACTION, post(add_transaction))
        .route(endpoints::GET_TRANSACTIONS, post(get_transactions))
        .route(endpoints::UPDATE_TRANSACTION, put(update_transaction))
        .route(endpoints::DELETE_TRANSACTION, delete(delete_transaction))
        .fallback(not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({"success": true, "message": "I'm a teapot"})),
    )
        .into_response()
}

/// The response for requests that match no route.
async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": "Not found"})),
    )
        .into_response()
}
