//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::AlertView, database_id::TransactionId, endpoints,
    shared_templates::render,
};

use super::{
    core::{Category, TransactionChanges},
    create_endpoint::TransactionForm,
    store::update_transaction,
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection backing the record stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the transaction with `transaction_id`,
/// redirects to the transactions view on success.
///
/// The transaction's ID and kind are immutable: a category from the other
/// category set is rejected with an alert.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
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

    let changes = TransactionChanges {
        amount: Some(form.amount),
        currency: Some(form.currency),
        category: Some(category),
        account_id: Some(form.account_id),
        date: Some(form.date),
        description: Some(form.description),
    };

    let connection = state.db_connection.lock().unwrap();

    match update_transaction(transaction_id, changes, &connection) {
        Ok(true) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(false) => Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
