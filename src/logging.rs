//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::Response,
};
use serde_json::{Value, json};

/// The maximum number of body bytes to log at the info level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both are logged at the info level. Bodies longer than
/// [LOG_BODY_LENGTH_LIMIT] bytes are truncated at the info level and logged in
/// full at the debug level.
///
/// The password field of JSON request bodies is redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    if parts.method == Method::POST
        && parts.headers.get(CONTENT_TYPE) == Some(&"application/json".parse().unwrap())
    {
        log_request(&parts, &redact_password(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_text));
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, Body::from(body_text))
}

async fn extract_parts_and_body_text_from_request(request: Request) -> (request::Parts, String) {
    let (parts, body) = request.into_parts();
    let request_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let body_text = String::from_utf8_lossy(&request_bytes).to_string();

    (parts, body_text)
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (response::Parts, String) {
    let (parts, body) = response.into_parts();
    let response_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let body_text = String::from_utf8_lossy(&response_bytes).to_string();

    (parts, body_text)
}

/// Replace the value of the top level "password" field of a JSON object with
/// asterisks.
///
/// Returns `body_text` unchanged if it is not a JSON object or has no
/// password field.
fn redact_password(body_text: &str) -> String {
    match serde_json::from_str::<Value>(body_text) {
        Ok(mut body) => {
            if let Some(password) = body.as_object_mut().and_then(|map| map.get_mut("password")) {
                *password = json!("********");
            }

            body.to_string()
        }
        Err(_) => body_text.to_string(),
    }
}

fn log_request(parts: &request::Parts, body_text: &str) {
    if body_text.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            &body_text[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!(
            "Received request: {} {}\nbody: {}",
            parts.method,
            parts.uri,
            body_text
        );
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {}",
            parts.method,
            parts.uri,
            body_text
        );
    }
}

fn log_response(parts: &response::Parts, body_text: &str) {
    if body_text.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            &body_text[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Sending response: {}\nbody: {}", parts.status, body_text);
    } else {
        tracing::info!("Sending response: {}\nbody: {}", parts.status, body_text);
    }
}
