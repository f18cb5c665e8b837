//! The API's endpoint URIs.
//!
//! For endpoints that take a path parameter, e.g.,
//! "/api/v1/transactions/deleteTransaction/{transaction_id}", use
//! [format_endpoint] to create the concrete URI.

/// The route to request a cup of coffee from the server.
pub const COFFEE: &str = "/api/coffee";

/// The route for registering a new user account.
pub const SIGN_UP: &str = "/api/v1/user/signup";

/// The route for signing in to an existing user account.
pub const SIGN_IN: &str = "/api/v1/user/signin";

/// The route to record a new transaction.
pub const ADD_TRANSACTION: &str = "/api/v1/transactions/addTransaction";

/// The route to list the authenticated user's transactions.
pub const GET_TRANSACTIONS: &str = "/api/v1/transactions/getTransactions";

/// The route to update an existing transaction.
pub const UPDATE_TRANSACTION: &str = "/api/v1/transactions/updateTransaction/{transaction_id}";

/// The route to delete an existing transaction.
pub const DELETE_TRANSACTION: &str = "/api/v1/transactions/deleteTransaction/{transaction_id}";

/// Create a concrete URI from an `endpoint_path` with a placeholder, e.g.,
/// "/api/v1/transactions/updateTransaction/{transaction_id}", and an `id`.
///
/// Returns the path unchanged if it has no placeholder.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut uri = String::with_capacity(endpoint_path.len());
    let mut in_placeholder = false;

    for c in endpoint_path.chars() {
        match c {
            '{' => {
                in_placeholder = true;
                uri.push_str(&id.to_string());
            }
            '}' => in_placeholder = false,
            c if !in_placeholder => uri.push(c),
            _ => {}
        }
    }

    uri
}
