//! Defines the endpoint for cloning a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, alert::AlertView, database_id::TransactionId, endpoints, shared_templates::render,
};

use super::store::clone_transaction;

/// The state needed to clone a transaction.
#[derive(Debug, Clone)]
pub struct CloneTransactionState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CloneTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that duplicates the transaction with `transaction_id`.
///
/// The copy keeps every field except the ID. On success the client is
/// redirected to the copy's edit page so the user can tweak it.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn clone_transaction_endpoint(
    State(state): State<CloneTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match clone_transaction(transaction_id, &connection) {
        Ok(Some(copy)) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::EDIT_TRANSACTION_VIEW,
                copy.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(None) => render(
            StatusCode::NOT_FOUND,
            AlertView::error(
                "Could not clone transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if it has been deleted.",
            ),
        ),
        Err(error) => {
            tracing::error!("Could not clone transaction {transaction_id}: {error}");
            render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Could not clone transaction",
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
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        currency::Currency,
        db::initialize,
        transaction::core::{Category, ExpenseCategory, Transaction},
        transaction::store::{append_transaction, list_transactions},
    };

    use super::{CloneTransactionState, clone_transaction_endpoint};

    fn get_test_state() -> CloneTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CloneTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn clone_redirects_to_the_copys_edit_page() {
        let state = get_test_state();
        let original = {
            let connection = state.db_connection.lock().unwrap();
            append_transaction(
                Transaction::build(
                    50.0,
                    Currency::Usd,
                    Category::Expense(ExpenseCategory::Food),
                    1,
                    date!(2024 - 06 - 01),
                )
                .description("Groceries"),
                &connection,
            )
            .unwrap()
        };

        let response = clone_transaction_endpoint(State(state.clone()), Path(original.id))
            .await
            .into_response();

        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(location, "/transactions/2/edit");
        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].description, "Groceries");
    }

    #[tokio::test]
    async fn cloning_unknown_id_returns_not_found_alert() {
        let state = get_test_state();

        let response = clone_transaction_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
