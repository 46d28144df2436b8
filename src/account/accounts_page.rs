//! Defines the route handler for the page that lists accounts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_amount,
    },
    navigation::NavBar,
};

use super::core::{Account, list_accounts};

/// The state needed for the accounts page.
#[derive(Debug, Clone)]
pub struct AccountsViewState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the list of accounts.
pub async fn get_accounts_page(
    State(state): State<AccountsViewState>,
) -> Result<Response, Error> {
    let accounts = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        list_accounts(&connection)
            .inspect_err(|error| tracing::error!("could not list accounts: {error}"))?
    };

    Ok(accounts_view(&accounts).into_response())
}

fn accounts_view(accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-3xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Create Account"
                    }
                }

                div class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
                {
                    table class="w-full my-2 text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class="px-6 py-3" { "Name" }
                                th scope="col" class="px-6 py-3" { "Currency" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class="px-6 py-3" { "Actions" }
                            }
                        }

                        tbody
                        {
                            @if accounts.is_empty() {
                                tr
                                {
                                    td colspan="4" data-empty-state="true" class="h-24 text-center"
                                    {
                                        "No accounts yet. Create your first one!"
                                    }
                                }
                            }

                            @for account in accounts {
                                (account_row(account))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Accounts", &content)
}

fn account_row(account: &Account) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_ACCOUNT, account.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-account-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (account.name) }
            td class=(TABLE_CELL_STYLE) { (account.currency.code()) }

            td class="px-6 py-4 text-right"
            {
                @match account.balance {
                    Some(balance) => { (format_amount(account.currency, balance)) }
                    None => { span class="text-gray-400" { "not tracked" } }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-2"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-confirm="Delete this account? Its transactions are kept."
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{account::core::{Account, append_account}, currency::Currency, db::initialize};

    use super::{AccountsViewState, get_accounts_page};

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn lists_accounts_with_balances() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        append_account(
            Account::build("Checking Account", Currency::Usd).balance(Some(1234.5)),
            &conn,
        )
        .unwrap();
        append_account(Account::build("Cash", Currency::Ars), &conn).unwrap();
        let state = AccountsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let rows: Vec<_> = html
            .select(&Selector::parse("tbody tr[data-account-row='true']").unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        let first = rows[0].text().collect::<String>();
        assert!(first.contains("Checking Account"));
        assert!(first.contains("USD 1,234.50"));
        let second = rows[1].text().collect::<String>();
        assert!(second.contains("not tracked"));
    }

    #[tokio::test]
    async fn shows_empty_state_without_accounts() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = AccountsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        html.select(&Selector::parse("td[data-empty-state='true']").unwrap())
            .next()
            .expect("No empty-state row found");
    }
}
