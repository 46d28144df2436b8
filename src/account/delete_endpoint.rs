//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use rusqlite::Connection;

use crate::{AppState, alert::AlertView, database_id::AccountId, shared_templates::render};

use super::core::remove_account;

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account.
///
/// Transactions recorded against the account are kept, the ledger shows them
/// with an unknown-account label. On success the response body is empty so
/// HTMX removes the table row.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match remove_account(account_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(removed) if removed > 0 => Html("").into_response(),
        Ok(_) => render(
            StatusCode::NOT_FOUND,
            AlertView::error(
                "Could not delete account",
                "The account could not be found. \
                Try refreshing the page to see if the account has already been deleted.",
            ),
        ),
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
            render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Could not delete account",
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
    use rusqlite::Connection;

    use crate::{
        account::core::{Account, append_account, list_accounts},
        currency::Currency,
        db::initialize,
    };

    use super::{DeleteAccountState, delete_account_endpoint};

    fn get_test_state() -> DeleteAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        DeleteAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_account() {
        let state = get_test_state();
        let account = {
            let connection = state.db_connection.lock().unwrap();
            append_account(Account::build("Checking", Currency::Usd), &connection).unwrap()
        };

        let response = delete_account_endpoint(State(state.clone()), Path(account.id))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_accounts(&connection).unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn deleting_unknown_id_returns_not_found_alert() {
        let state = get_test_state();

        let response = delete_account_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
