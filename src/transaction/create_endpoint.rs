//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, alert::AlertView, currency::Currency, database_id::AccountId, endpoints,
    shared_templates::render,
};

use super::{
    core::{Category, Transaction},
    store::append_transaction,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection backing the record stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction. Must be non-negative.
    pub amount: f64,
    /// The currency the transaction was made in.
    pub currency: Currency,
    /// The kind-qualified category value, e.g. "expense-food".
    pub category: String,
    /// The account the transaction was made against.
    pub account_id: AccountId,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> impl IntoResponse {
    let Some(category) = Category::from_query_value(&form.category) else {
        return render(
            StatusCode::BAD_REQUEST,
            AlertView::error(
                "Invalid category",
                &format!("\"{}\" is not a recognized category.", form.category),
            ),
        );
    };

    let builder = Transaction::build(form.amount, form.currency, category, form.account_id, form.date)
        .description(&form.description);

    let connection = state.db_connection.lock().unwrap();

    if let Err(error) = append_transaction(builder, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
