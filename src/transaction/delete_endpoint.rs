//! Defines the endpoints for deleting transactions, one at a time or in bulk.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, alert::AlertView, database_id::TransactionId, endpoints, shared_templates::render,
};

use super::{
    selection::SelectionTracker,
    store::{list_transactions, remove_transaction, remove_transactions},
};

/// The state needed to delete transactions.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a single transaction.
///
/// On success the response body is empty so HTMX removes the table row.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match remove_transaction(transaction_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(removed) if removed > 0 => Html("").into_response(),
        Ok(_) => render(
            StatusCode::NOT_FOUND,
            AlertView::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            ),
        ),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Could not delete transaction",
                    "An unexpected error occurred. Try again later or check the logs on the server.",
                ),
            )
        }
    }
}

/// The form data for the bulk delete endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteSelectedForm {
    /// The IDs selected in the ledger table.
    #[serde(default)]
    pub selected: Vec<TransactionId>,
}

/// A route handler for deleting every selected transaction in one request.
///
/// The submitted selection may be stale (another tab or an earlier delete
/// may have removed records), so it is pruned against the stored record set
/// before deleting. Redirects back to the transactions view.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_selected_transactions_endpoint(
    State(state): State<DeleteTransactionState>,
    Form(form): Form<DeleteSelectedForm>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let mut selection = SelectionTracker::from_ids(form.selected);
    let existing: Vec<TransactionId> = match list_transactions(&connection) {
        Ok(transactions) => transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect(),
        Err(error) => {
            tracing::error!("Could not list transactions for bulk delete: {error}");
            return render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Could not delete transactions",
                    "An unexpected error occurred. Try again later or check the logs on the server.",
                ),
            );
        }
    };
    selection.prune(&existing);

    let ids: Vec<TransactionId> = selection.ids().collect();
    match remove_transactions(&ids, &connection) {
        Ok(removed) => {
            tracing::debug!("Deleted {removed} selected transactions.");
            Redirect::to(endpoints::TRANSACTIONS_VIEW).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete selected transactions: {error}");
            render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Could not delete transactions",
                    "An unexpected error occurred. Try again later or check the logs on the server.",
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        currency::Currency,
        db::initialize,
        transaction::core::{Category, ExpenseCategory, NewTransaction, Transaction},
        transaction::store::{append_transaction, list_transactions},
    };

    use super::{
        DeleteSelectedForm, DeleteTransactionState, delete_selected_transactions_endpoint,
        delete_transaction_endpoint,
    };

    fn get_test_state() -> DeleteTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn test_builder() -> NewTransaction {
        Transaction::build(
            1.0,
            Currency::Usd,
            Category::Expense(ExpenseCategory::Other),
            1,
            date!(2024 - 06 - 01),
        )
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            append_transaction(test_builder(), &connection).unwrap()
        };

        let response = delete_transaction_endpoint(State(state.clone()), Path(transaction.id))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_transactions(&connection).unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn deleting_unknown_id_returns_not_found_alert() {
        let state = get_test_state();

        let response = delete_transaction_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bulk_delete_removes_selected_and_skips_stale_ids() {
        let state = get_test_state();
        let (first, second) = {
            let connection = state.db_connection.lock().unwrap();
            (
                append_transaction(test_builder(), &connection).unwrap(),
                append_transaction(test_builder(), &connection).unwrap(),
            )
        };

        let response = delete_selected_transactions_endpoint(
            State(state.clone()),
            Form(DeleteSelectedForm {
                // 999 is stale, e.g. deleted from another tab.
                selected: vec![first.id, 999],
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_transactions(&connection).unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn bulk_delete_with_empty_selection_is_a_noop() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            append_transaction(test_builder(), &connection).unwrap();
        }

        let response = delete_selected_transactions_endpoint(
            State(state.clone()),
            Form(DeleteSelectedForm::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_transactions(&connection).unwrap().len(), 1);
    }
}
