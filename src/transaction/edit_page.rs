//! Defines the page with the form for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::list_accounts,
    database_id::TransactionId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
};

use super::{
    form::{TransactionFormOptions, transaction_form},
    store::get_transaction,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page with the form for editing the transaction with
/// `transaction_id`.
///
/// The transaction's kind is immutable, so the form only offers categories
/// from the matching set.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let (transaction, accounts) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        (
            get_transaction(transaction_id, &connection)?,
            list_accounts(&connection)
                .inspect_err(|error| tracing::error!("could not list accounts: {error}"))?,
        )
    };

    let action = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4"
            {
                "Edit " (transaction.kind().label())
            }

            (transaction_form(TransactionFormOptions {
                action: &action,
                use_put: true,
                submit_label: "Save",
                prefill: Some(&transaction),
                default_date: transaction.date,
                accounts: &accounts,
            }))

            p class="py-2"
            {
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back to Transactions" }
            }
        }
    };

    Ok(base("Edit Transaction", &content).into_response())
}
