//! Defines the endpoint for updating an existing account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, database_id::AccountId, endpoints};

use super::{
    core::{AccountChanges, update_account},
    create_endpoint::AccountForm,
};

/// The state needed to update an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection backing the record stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the account with `account_id`, redirects to
/// the accounts view on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<AccountForm>,
) -> impl IntoResponse {
    let changes = AccountChanges {
        name: Some(form.name),
        currency: Some(form.currency),
        balance: Some(form.balance),
    };

    let connection = state.db_connection.lock().unwrap();

    match update_account(account_id, changes, &connection) {
        Ok(true) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(false) => Error::UpdateMissingAccount.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}
