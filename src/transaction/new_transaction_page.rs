//! Defines the page with the form for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::list_accounts,
    endpoints,
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base, link},
    navigation::NavBar,
    timezone::current_local_date,
};

use super::form::{TransactionFormOptions, transaction_form};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page with the form for creating a new transaction.
///
/// Transactions are recorded against an account, so when no account exists
/// yet the page points the user at the account creation form instead.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let accounts = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        list_accounts(&connection)
            .inspect_err(|error| tracing::error!("could not list accounts: {error}"))?
    };

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4" { "Create Transaction" }

            @if accounts.is_empty() {
                p data-no-accounts="true"
                {
                    "Transactions are recorded against an account. "
                    (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                    " first."
                }
            } @else {
                (transaction_form(TransactionFormOptions {
                    action: endpoints::TRANSACTIONS_API,
                    use_put: false,
                    submit_label: "Create",
                    prefill: None,
                    default_date: today,
                    accounts: &accounts,
                }))
            }

            p class="py-2"
            {
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back to Transactions" }
            }
        }
    };

    Ok(base("Create Transaction", &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        account::{Account, append_account},
        currency::Currency,
        db::initialize,
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    fn get_test_state(conn: Connection) -> NewTransactionPageState {
        NewTransactionPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn shows_form_when_accounts_exist() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();

        let response = get_new_transaction_page(State(get_test_state(conn)))
            .await
            .unwrap();

        let html = parse_html(response).await;
        html.select(&Selector::parse("form select[name='category']").unwrap())
            .next()
            .expect("No category select found");
        let account_options = html
            .select(&Selector::parse("select[name='account_id'] option").unwrap())
            .count();
        assert_eq!(account_options, 1);
    }

    #[tokio::test]
    async fn points_at_account_creation_when_no_accounts_exist() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let response = get_new_transaction_page(State(get_test_state(conn)))
            .await
            .unwrap();

        let html = parse_html(response).await;
        html.select(&Selector::parse("[data-no-accounts='true']").unwrap())
            .next()
            .expect("Expected the no-accounts notice");
        assert!(
            html.select(&Selector::parse("form").unwrap()).next().is_none(),
            "The transaction form should not render without accounts"
        );
    }
}
