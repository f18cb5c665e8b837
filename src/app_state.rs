//! Defines the app state that is shared between route handlers.

use axum::extract::FromRef;

use crate::{
    auth::JwtKeys,
    stores::{TransactionStore, UserStore},
};

/// The state of the application, shared between all route handlers.
#[derive(Debug, Clone)]
pub struct AppState<U, T>
where
    U: UserStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    /// The keys used for signing and verifying auth tokens.
    pub jwt_keys: JwtKeys,
    /// The store for users of the application.
    pub user_store: U,
    /// The store for the transactions users record.
    pub transaction_store: T,
}

impl<U, T> AppState<U, T>
where
    U: UserStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    /// Create a new app state.
    ///
    /// `jwt_secret` is the string used for signing and verifying auth tokens.
    pub fn new(jwt_secret: &str, user_store: U, transaction_store: T) -> Self {
        Self {
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            user_store,
            transaction_store,
        }
    }
}

// This impl tells the `Claims` extractor how to access the keys from our
// state.
impl<U, T> FromRef<AppState<U, T>> for JwtKeys
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<U, T>) -> Self {
        state.jwt_keys.clone()
    }
}
