//! The route handlers for recording and listing transactions.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{
        Amount, CategoryName, NewTransaction, TransactionTitle, TransactionType, UserID,
        parse_transaction_date,
    },
    routes::responses::{TransactionListResponse, TransactionResponse},
    stores::{TransactionFilter, TransactionStore, UserStore},
};

/// The request body for recording a new transaction.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionBody {
    /// A short label summarising the transaction.
    pub title: String,
    /// The date the transaction occurred, in the format YYYY-MM-DD.
    pub date: String,
    /// The amount of money spent or received.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category: String,
    /// A free form note about the transaction.
    pub description: String,
    /// Either "Expense" or "Credit".
    pub transaction_type: String,
}

/// A route handler for recording a new transaction for the authenticated
/// user.
///
/// # Errors
/// Returns [Error::InvalidFields] if any field fails validation, or
/// [Error::UserNotFound] if the authenticated user no longer exists.
pub async fn add_transaction<U, T>(
    State(mut state): State<AppState<U, T>>,
    claims: Claims,
    Json(body): Json<AddTransactionBody>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let new_transaction = validate_new_transaction(&body, claims.user_id)?;

    state.user_store.get(claims.user_id)?;

    let transaction = state.transaction_store.create(new_transaction)?;

    Ok((
        StatusCode::OK,
        Json(TransactionResponse {
            success: true,
            message: "Transaction added successfully".to_string(),
            transaction,
        }),
    )
        .into_response())
}

/// Validate all fields of an add transaction request, collecting the error
/// messages of every field that failed.
fn validate_new_transaction(
    body: &AddTransactionBody,
    user_id: UserID,
) -> Result<NewTransaction, Error> {
    let title = TransactionTitle::new(&body.title);
    let date = parse_transaction_date(&body.date);
    let amount = Amount::new(body.amount);
    let category = CategoryName::new(&body.category);
    let description = if body.description.is_empty() {
        Err(Error::EmptyDescription)
    } else {
        Ok(body.description.clone())
    };
    let transaction_type = body.transaction_type.parse::<TransactionType>();

    match (title, date, amount, category, description, transaction_type) {
        (Ok(title), Ok(date), Ok(amount), Ok(category), Ok(description), Ok(transaction_type)) => {
            Ok(NewTransaction {
                title,
                date,
                amount,
                category,
                description,
                transaction_type,
                user_id,
            })
        }
        (title, date, amount, category, description, transaction_type) => {
            Err(Error::InvalidFields(
                [
                    title.err(),
                    date.err(),
                    amount.err(),
                    category.err(),
                    description.err(),
                    transaction_type.err(),
                ]
                .into_iter()
                .flatten()
                .map(|error| error.to_string())
                .collect(),
            ))
        }
    }
}

/// The request body for listing transactions. All filters are optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQueryBody {
    /// Either a transaction type to keep, or "all" to keep every type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The first date to include, in the format YYYY-MM-DD.
    pub start_date: Option<String>,
    /// The last date to include, in the format YYYY-MM-DD.
    pub end_date: Option<String>,
}

/// A route handler for listing the authenticated user's transactions.
///
/// Transactions are returned in the order they were recorded. The date range
/// filter only applies when both `startDate` and `endDate` are present.
///
/// # Errors
/// Returns [Error::InvalidFields] if a filter fails validation, or
/// [Error::UserNotFound] if the authenticated user no longer exists.
pub async fn get_transactions<U, T>(
    State(state): State<AppState<U, T>>,
    claims: Claims,
    Json(body): Json<TransactionQueryBody>,
) -> Result<Response, Error>
where
    U: UserStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let filter = validate_filter(&body)?;

    state.user_store.get(claims.user_id)?;

    let transactions = state.transaction_store.get_by_user(claims.user_id, &filter)?;

    Ok((
        StatusCode::OK,
        Json(TransactionListResponse {
            success: true,
            transactions,
        }),
    )
        .into_response())
}

/// Build a [TransactionFilter] from the optional fields of a list request.
///
/// A missing type or the value "all" means no type filter. The date range is
/// ignored unless both dates are present.
fn validate_filter(body: &TransactionQueryBody) -> Result<TransactionFilter, Error> {
    let mut errors = vec![];
    let mut filter = TransactionFilter::default();

    if let Some(transaction_type) = body.transaction_type.as_deref() {
        if transaction_type != "all" {
            match transaction_type.parse() {
                Ok(transaction_type) => filter.transaction_type = Some(transaction_type),
                Err(error) => errors.push(error.to_string()),
            }
        }
    }

    if let (Some(start_date), Some(end_date)) = (&body.start_date, &body.end_date) {
        match (
            parse_transaction_date(start_date),
            parse_transaction_date(end_date),
        ) {
            (Ok(start_date), Ok(end_date)) => filter.date_range = Some(start_date..=end_date),
            (start_date, end_date) => {
                errors.extend(start_date.err().map(|error| error.to_string()));
                errors.extend(end_date.err().map(|error| error.to_string()));
            }
        }
    }

    if errors.is_empty() {
        Ok(filter)
    } else {
        Err(Error::InvalidFields(errors))
    }
}


#[cfg(test)]
mod get_transactions_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::{
        endpoints,
        responses::TransactionListResponse,
        test_helpers::{add_test_transaction, coffee_body, get_test_app, sign_up_test_user},
    };

    #[tokio::test]
    async fn get_transactions_returns_own_transactions_only() {
        let (server, _) = get_test_app();
        let first_token = sign_up_test_user(&server, "jane@example.com").await;
        let second_token = sign_up_test_user(&server, "john@example.com").await;

        add_test_transaction(&server, &first_token, &coffee_body()).await;
        add_test_transaction(&server, &first_token, &coffee_body()).await;
        add_test_transaction(&server, &second_token, &coffee_body()).await;

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&first_token)
            .json(&json!({}))
            .await;

        response.assert_status_ok();

        let body = response.json::<TransactionListResponse>();
        assert!(body.success);
        assert_eq!(
            body.transactions.len(),
            2,
            "got {} transactions, want 2",
            body.transactions.len()
        );

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&second_token)
            .json(&json!({}))
            .await;

        let body = response.json::<TransactionListResponse>();
        assert_eq!(
            body.transactions.len(),
            1,
            "got {} transactions, want 1",
            body.transactions.len()
        );
    }

    #[tokio::test]
    async fn get_transactions_filters_by_type() {
        let (server, _) = get_test_app();
        let token = sign_up_test_user(&server, "jane@example.com").await;

        add_test_transaction(&server, &token, &coffee_body()).await;

        let mut salary = coffee_body();
        salary["title"] = json!("Salary");
        salary["transactionType"] = json!("Credit");
        add_test_transaction(&server, &token, &salary).await;

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"type": "Credit"}))
            .await;

        let body = response.json::<TransactionListResponse>();
        assert_eq!(body.transactions.len(), 1);
        assert_eq!(body.transactions[0].title().as_ref(), "Salary");

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"type": "all"}))
            .await;

        let body = response.json::<TransactionListResponse>();
        assert_eq!(body.transactions.len(), 2);
    }

    #[tokio::test]
    async fn get_transactions_filters_by_date_range() {
        let (server, _) = get_test_app();
        let token = sign_up_test_user(&server, "jane@example.com").await;

        for date in ["2024-01-01", "2024-01-05", "2024-01-10"] {
            let mut body = coffee_body();
            body["date"] = json!(date);
            add_test_transaction(&server, &token, &body).await;
        }

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"startDate": "2024-01-01", "endDate": "2024-01-05"}))
            .await;

        let body = response.json::<TransactionListResponse>();
        assert_eq!(
            body.transactions.len(),
            2,
            "got {} transactions, want 2",
            body.transactions.len()
        );
    }

    #[tokio::test]
    async fn get_transactions_ignores_lone_start_date() {
        let (server, _) = get_test_app();
        let token = sign_up_test_user(&server, "jane@example.com").await;

        for date in ["2024-01-01", "2024-01-10"] {
            let mut body = coffee_body();
            body["date"] = json!(date);
            add_test_transaction(&server, &token, &body).await;
        }

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"startDate": "2024-01-10"}))
            .await;

        let body = response.json::<TransactionListResponse>();
        assert_eq!(
            body.transactions.len(),
            2,
            "got {} transactions, want 2",
            body.transactions.len()
        );
    }

    #[tokio::test]
    async fn get_transactions_rejects_invalid_type() {
        let (server, _) = get_test_app();
        let token = sign_up_test_user(&server, "jane@example.com").await;

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"type": "Transfer"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_transactions_rejects_invalid_date() {
        let (server, _) = get_test_app();
        let token = sign_up_test_user(&server, "jane@example.com").await;

        let response = server
            .post(endpoints::GET_TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"startDate": "01/01/2024", "endDate": "2024-01-05"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
