//! Defines the route handler for the dashboard page.
//!
//! The dashboard summarizes the current month: per-currency expense and
//! income totals over the records the month filter keeps.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    currency::Currency,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_amount},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{
        DatePreset, FilterCriteria, TransactionKind, aggregate_by_currency, filter_transactions,
        list_transactions, resolve_date_bounds,
    },
};

/// One row of the dashboard summary table.
struct CurrencySummary {
    currency: Currency,
    expenses: f64,
    income: f64,
}

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardViewState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for DashboardViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the dashboard with this month's per-currency totals.
pub async fn get_dashboard_page(
    State(state): State<DashboardViewState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        list_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?
    };

    let this_month = FilterCriteria {
        date: resolve_date_bounds(DatePreset::ThisMonth, None, None, today),
        ..Default::default()
    };
    let month_transactions = filter_transactions(&transactions, &this_month);

    let expenses: Vec<_> = month_transactions
        .iter()
        .filter(|transaction| transaction.kind() == TransactionKind::Expense)
        .cloned()
        .collect();
    let incomes: Vec<_> = month_transactions
        .iter()
        .filter(|transaction| transaction.kind() == TransactionKind::Income)
        .cloned()
        .collect();

    let expense_totals = aggregate_by_currency(&expenses);
    let income_totals = aggregate_by_currency(&incomes);

    // One row per currency that saw any activity this month.
    let mut currencies: Vec<Currency> = expense_totals.keys().copied().collect();
    for currency in income_totals.keys() {
        if !currencies.contains(currency) {
            currencies.push(*currency);
        }
    }
    currencies.sort();

    let summaries: Vec<CurrencySummary> = currencies
        .into_iter()
        .map(|currency| CurrencySummary {
            currency,
            expenses: expense_totals.get(&currency).copied().unwrap_or(0.0),
            income: income_totals.get(&currency).copied().unwrap_or(0.0),
        })
        .collect();

    Ok(dashboard_view(&summaries, month_transactions.len()).into_response())
}

fn dashboard_view(summaries: &[CurrencySummary], transaction_count: usize) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-3xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "This Month" }

                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
                    {
                        "View Transactions"
                    }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (transaction_count) " transactions recorded this month"
                }

                div class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
                {
                    table class="w-full my-2 text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class="px-6 py-3" { "Currency" }
                                th scope="col" class="px-6 py-3 text-right" { "Expenses" }
                                th scope="col" class="px-6 py-3 text-right" { "Income" }
                                th scope="col" class="px-6 py-3 text-right" { "Net" }
                            }
                        }

                        tbody
                        {
                            @if summaries.is_empty() {
                                tr
                                {
                                    td colspan="4" data-empty-state="true" class="h-24 text-center"
                                    {
                                        "No transactions this month."
                                    }
                                }
                            }

                            @for summary in summaries {
                                @let net = summary.income - summary.expenses;
                                tr class=(TABLE_ROW_STYLE) data-summary-row="true"
                                {
                                    td class=(TABLE_CELL_STYLE) { (summary.currency.code()) }

                                    td class="px-6 py-4 text-right text-red-700 dark:text-red-300"
                                    {
                                        (format_amount(summary.currency, summary.expenses))
                                    }

                                    td class="px-6 py-4 text-right text-green-700 dark:text-green-300"
                                    {
                                        (format_amount(summary.currency, summary.income))
                                    }

                                    td class="px-6 py-4 text-right font-medium"
                                    {
                                        @if net < 0.0 {
                                            "-" (format_amount(summary.currency, net.abs()))
                                        } @else {
                                            (format_amount(summary.currency, net))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Dashboard", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        currency::Currency,
        db::initialize,
        transaction::{Category, ExpenseCategory, IncomeCategory, Transaction, append_transaction},
    };

    use super::{DashboardViewState, get_dashboard_page};

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn summarizes_current_month_per_currency() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let today = OffsetDateTime::now_utc().date();
        append_transaction(
            Transaction::build(
                50.0,
                Currency::Usd,
                Category::Expense(ExpenseCategory::Food),
                1,
                today,
            ),
            &conn,
        )
        .unwrap();
        append_transaction(
            Transaction::build(
                1200.0,
                Currency::Usd,
                Category::Income(IncomeCategory::Salary),
                1,
                today,
            ),
            &conn,
        )
        .unwrap();
        let state = DashboardViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let rows: Vec<String> = html
            .select(&Selector::parse("tbody tr[data-summary-row='true']").unwrap())
            .map(|row| row.text().collect())
            .collect();
        assert_eq!(rows.len(), 1, "want one summary row for USD, got {rows:?}");
        assert!(rows[0].contains("USD 50.00"));
        assert!(rows[0].contains("USD 1,200.00"));
        assert!(rows[0].contains("USD 1,150.00"));
    }

    #[tokio::test]
    async fn shows_empty_state_without_activity() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = DashboardViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        html.select(&Selector::parse("td[data-empty-state='true']").unwrap())
            .next()
            .expect("No empty-state row found");
    }
}
