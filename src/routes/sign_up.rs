//! The route handler for registering a new user account.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::encode_token,
    models::{NewUser, PasswordHash, PersonName, RawPassword, parse_username},
    routes::responses::AuthResponse,
    stores::{TransactionStore, UserStore},
};

/// The request body for creating a new user account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    /// The username, which must be an email address.
    pub username: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The password the user will sign in with.
    pub password: String,
}

/// A route handler for creating a new user account.
///
/// On success, responds with a token the client can use to authenticate
/// requests to the transaction endpoints.
///
/// # Errors
/// Returns [Error::InvalidFields] if any field fails validation, or
/// [Error::DuplicateUsername] if the username is already registered.
pub async fn sign_up<U, T>(
    State(mut state): State<AppState<U, T>>,
    Json(body): Json<SignUpBody>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let (username, first_name, last_name, password) = validate_sign_up(&body)?;

    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;
    let user = state.user_store.create(NewUser {
        username,
        first_name,
        last_name,
        password_hash,
    })?;

    let token = encode_token(user.id(), &state.jwt_keys)?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            success: true,
            msg: "User created successfully".to_string(),
            token,
        }),
    )
        .into_response())
}

/// Validate all fields of a sign up request, collecting the error messages of
/// every field that failed.
fn validate_sign_up(
    body: &SignUpBody,
) -> Result<(EmailAddress, PersonName, PersonName, RawPassword), Error> {
    let username = parse_username(&body.username);
    let first_name = PersonName::new(&body.first_name);
    let last_name = PersonName::new(&body.last_name);
    let password = RawPassword::new(&body.password);

    match (username, first_name, last_name, password) {
        (Ok(username), Ok(first_name), Ok(last_name), Ok(password)) => {
            Ok((username, first_name, last_name, password))
        }
        (username, first_name, last_name, password) => Err(Error::InvalidFields(
            [
                username.err(),
                first_name.err(),
                last_name.err(),
                password.err(),
            ]
            .into_iter()
            .flatten()
            .map(|error| error.to_string())
            .collect(),
        )),
    }
}
