//! Defines the endpoint for creating a new account.

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

use crate::{AppState, currency::Currency, endpoints};

use super::core::{Account, append_account};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection backing the record stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The display name of the account.
    pub name: String,
    /// The account's home currency.
    pub currency: Currency,
    /// The balance, if the user chose to track one.
    pub balance: Option<f64>,
}

/// A route handler for creating a new account, redirects to the accounts
/// view on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> impl IntoResponse {
    let builder = Account::build(&form.name, form.currency).balance(form.balance);

    let connection = state.db_connection.lock().unwrap();

    if let Err(error) = append_account(builder, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{account::core::list_accounts, currency::Currency, db::initialize};

    use super::{AccountForm, CreateAccountState, create_account_endpoint};

    fn get_test_state() -> CreateAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_account() {
        let state = get_test_state();
        let form = AccountForm {
            name: "Checking Account".to_owned(),
            currency: Currency::Usd,
            balance: Some(100.0),
        };

        let response = create_account_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert!(response.headers().contains_key(HX_REDIRECT));
        let connection = state.db_connection.lock().unwrap();
        let accounts = list_accounts(&connection).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Checking Account");
        assert_eq!(accounts[0].balance, Some(100.0));
    }

    #[tokio::test]
    async fn duplicate_name_returns_alert() {
        let state = get_test_state();
        let form = || AccountForm {
            name: "Checking Account".to_owned(),
            currency: Currency::Usd,
            balance: None,
        };
        create_account_endpoint(State(state.clone()), Form(form()))
            .await
            .into_response();

        let response = create_account_endpoint(State(state.clone()), Form(form()))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_accounts(&connection).unwrap().len(), 1);
    }
}
