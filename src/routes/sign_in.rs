//! The route handler for signing in to an existing user account.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::encode_token,
    models::parse_username,
    routes::responses::AuthResponse,
    stores::{TransactionStore, UserStore},
};

/// The request body for signing in.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInBody {
    /// The username the user signed up with.
    pub username: String,
    /// The user's password.
    pub password: String,
}

/// A route handler for signing in to an existing user account.
///
/// On success, responds with a token the client can use to authenticate
/// requests to the transaction endpoints.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the username is not registered or
/// the password is wrong. The client cannot tell which of the two happened.
pub async fn sign_in<U, T>(
    State(state): State<AppState<U, T>>,
    Json(body): Json<SignInBody>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let username = parse_username(&body.username)
        .map_err(|error| Error::InvalidFields(vec![error.to_string()]))?;

    let user = state
        .user_store
        .get_by_username(&username)
        .map_err(|error| match error {
            Error::UserNotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&body.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id(), &state.jwt_keys)?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            success: true,
            msg: format!("Welcome back {}", user.first_name()),
            token,
        }),
    )
        .into_response())
}
