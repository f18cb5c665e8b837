//! Issues and validates the JSON Web Tokens that authenticate API requests.
//!
//! Code in this module is adapted from <https://github.com/ezesundayeze/axum--auth>
//! and <https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs>.

use std::fmt;

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long a token stays valid after being issued.
pub const TOKEN_DURATION: Duration = Duration::hours(24);

/// The keys used for signing and verifying tokens.
///
/// Both keys are derived from the same secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create the signing and verifying keys from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

// The inner key types do not implement Debug.
impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

/// The contents of a JSON Web Token.
///
/// Extracting `Claims` in a route handler makes that route require a valid
/// bearer token in the Authorization header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub user_id: UserID,
    /// The time the token expires as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

/// Create a signed token for the user with `user_id`.
///
/// The token expires [TOKEN_DURATION] after it is issued.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(user_id: UserID, keys: &JwtKeys) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        user_id,
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding).map_err(|_| Error::TokenCreation)
}

/// Validate `token` and extract its claims.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, was not signed
/// with the expected secret, is missing the user ID, or has expired.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::MissingToken)?;

        let keys = JwtKeys::from_ref(state);

        decode_token(bearer.token(), &keys)
    }
}

#[cfg(test)]
mod token_tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, models::UserID};

    use super::{Claims, JwtKeys, decode_token, encode_token};

    #[test]
    fn encode_then_decode_preserves_user_id() {
        let keys = JwtKeys::from_secret("foobar");
        let user_id = UserID::new(42);

        let token = encode_token(user_id, &keys).expect("Could not encode token.");
        let claims = decode_token(&token, &keys).expect("Could not decode token.");

        assert_eq!(claims.user_id, user_id);
    }

    #[test]
    fn decode_fails_with_wrong_secret() {
        let keys = JwtKeys::from_secret("foobar");
        let other_keys = JwtKeys::from_secret("bazqux");

        let token = encode_token(UserID::new(42), &keys).expect("Could not encode token.");

        assert_eq!(decode_token(&token, &other_keys), Err(Error::InvalidToken));
    }

    #[test]
    fn decode_fails_with_garbage_token() {
        let keys = JwtKeys::from_secret("foobar");

        assert_eq!(decode_token("not.a.token", &keys), Err(Error::InvalidToken));
    }

    #[test]
    fn decode_fails_with_expired_token() {
        let keys = JwtKeys::from_secret("foobar");
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            user_id: UserID::new(42),
            exp: (now - Duration::hours(2)).unix_timestamp() as usize,
            iat: (now - Duration::hours(3)).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("foobar".as_bytes()),
        )
        .expect("Could not encode token.");

        assert_eq!(decode_token(&token, &keys), Err(Error::InvalidToken));
    }

    #[test]
    fn decode_fails_with_token_missing_user_id() {
        let keys = JwtKeys::from_secret("foobar");
        let now = OffsetDateTime::now_utc();
        let claims = serde_json::json!({
            "exp": (now + Duration::hours(1)).unix_timestamp(),
            "iat": now.unix_timestamp(),
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("foobar".as_bytes()),
        )
        .expect("Could not encode token.");

        assert_eq!(decode_token(&token, &keys), Err(Error::InvalidToken));
    }
}

#[cfg(test)]
mod extractor_tests {
    use axum::{Router, http::StatusCode, response::Html, routing::get};
    use axum_test::TestServer;

    use crate::models::UserID;

    use super::{Claims, JwtKeys, encode_token};

    async fn handler_with_auth(_: Claims) -> Html<&'static str> {
        Html("<h1>Hello, World!</h1>")
    }

    fn get_test_server(keys: JwtKeys) -> TestServer {
        let app = Router::new()
            .route("/protected", get(handler_with_auth))
            .with_state(keys);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn request_with_valid_token_succeeds() {
        let keys = JwtKeys::from_secret("foobar");
        let token = encode_token(UserID::new(7), &keys).expect("Could not encode token.");
        let server = get_test_server(keys);

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn request_without_token_is_unauthorized() {
        let server = get_test_server(JwtKeys::from_secret("foobar"));

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_with_garbage_token_is_forbidden() {
        let server = get_test_server(JwtKeys::from_secret("foobar"));

        server
            .get("/protected")
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
