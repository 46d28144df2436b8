//! Defines the page with the form for editing an existing account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::AccountId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
};

use super::{core::get_account, create_page::account_form};

/// The state needed for the edit account page.
#[derive(Debug, Clone)]
pub struct EditAccountPageState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page with the form for editing the account with `account_id`.
pub async fn get_edit_account_page(
    State(state): State<EditAccountPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let account = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        get_account(account_id, &connection)?
    };

    let action = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4" { "Edit Account" }

            (account_form(&action, true, "Save", Some(&account)))

            p class="py-2"
            {
                a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Back to Accounts" }
            }
        }
    };

    Ok(base("Edit Account", &content).into_response())
}
