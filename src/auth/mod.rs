//! User authentication with JSON Web Tokens.

mod token;

pub use token::{Claims, JwtKeys, TOKEN_DURATION, decode_token, encode_token};
