//! Defines the route handler for the page that displays the transaction ledger.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::list_accounts,
    currency::Currency,
    database_id::TransactionId,
    endpoints,
    pagination::{PaginationConfig, create_pagination_indicators, paginate},
    timezone::current_local_date,
};

use super::{
    core::{Category, TransactionKind},
    criteria::{AmountComparison, AmountFilter, FilterCriteria, filter_transactions},
    models::{FilterFormModel, IndicatorLink, LedgerViewModel, TransactionRow},
    range::{DatePreset, resolve_date_bounds},
    selection::SelectionTracker,
    sort::{SortKey, SortOrder, sort_transactions},
    store::list_transactions,
    totals::aggregate_by_currency,
    view::transactions_view,
};

/// The raw query parameters for the transactions page.
///
/// Every field is optional, absent fields fall back to the defaults
/// ("this month", no predicate filters, date descending, first page).
/// Unrecognized values for the "all"-sentinel selects deterministically
/// disable the corresponding filter instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerQuery {
    /// The date filter preset.
    pub range: Option<DatePreset>,
    /// The custom range start date.
    pub start: Option<Date>,
    /// The custom range end date.
    pub end: Option<Date>,
    /// The kind-qualified category value, or "all".
    pub category: Option<String>,
    /// The currency code, or "all".
    pub currency: Option<String>,
    /// The account ID, or "all".
    pub account: Option<String>,
    /// Free-text search over descriptions.
    pub search: Option<String>,
    /// The amount comparison ("more-than"/"less-than"), or "all".
    pub amount: Option<String>,
    /// The amount threshold.
    pub amount_value: Option<f64>,
    /// The sort key.
    pub sort: Option<SortKey>,
    /// The sort direction.
    pub order: Option<SortOrder>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The IDs currently selected in the ledger table.
    #[serde(default)]
    pub selected: Vec<TransactionId>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection backing the record stores.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
    /// The config that controls how to display pages of data.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the transaction ledger: the filtered, sorted and paginated record
/// set with per-currency totals over the full filtered set.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let criteria = build_criteria(&query, today);
    let sort_key = query.sort.unwrap_or_default();
    let sort_order = query.order.unwrap_or_default();

    let (transactions, accounts) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        (
            list_transactions(&connection)
                .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?,
            list_accounts(&connection)
                .inspect_err(|error| tracing::error!("could not list accounts: {error}"))?,
        )
    };

    let total_count = transactions.len();
    let mut filtered = filter_transactions(&transactions, &criteria);

    // Totals cover the whole filtered set, not just the visible page.
    let expenses: Vec<_> = filtered
        .iter()
        .filter(|transaction| transaction.kind() == TransactionKind::Expense)
        .cloned()
        .collect();
    let incomes: Vec<_> = filtered
        .iter()
        .filter(|transaction| transaction.kind() == TransactionKind::Income)
        .cloned()
        .collect();
    let expense_totals = format_totals(&expenses);
    let income_totals = format_totals(&incomes);

    sort_transactions(&mut filtered, sort_key, sort_order);

    let requested_page = query.page.unwrap_or(state.pagination_config.default_page);
    let page = paginate(
        filtered,
        requested_page,
        state.pagination_config.default_page_size,
    );

    let selection = SelectionTracker::from_ids(query.selected.iter().copied());
    let page_ids: Vec<TransactionId> = page.items.iter().map(|transaction| transaction.id).collect();
    let all_on_page_selected = selection.is_all_on_page_selected(&page_ids);

    let rows: Vec<TransactionRow> = page
        .items
        .into_iter()
        .map(|transaction| TransactionRow::new_from_transaction(transaction, &accounts, &selection))
        .collect();

    let base_pairs = to_query_pairs(&query);
    let indicators = create_pagination_indicators(
        page.page,
        page.total_pages,
        state.pagination_config.max_pages,
    )
    .into_iter()
    .map(|indicator| {
        let href = match &indicator {
            crate::pagination::PaginationIndicator::Page(target)
            | crate::pagination::PaginationIndicator::NextButton(target)
            | crate::pagination::PaginationIndicator::BackButton(target) => {
                page_url(&base_pairs, *target)
            }
            _ => String::new(),
        };
        IndicatorLink { indicator, href }
    })
    .collect();

    let model = LedgerViewModel {
        rows,
        expense_totals,
        income_totals,
        filtered_count: page.total_count,
        total_count,
        indicators,
        sort_key,
        sort_order,
        date_sort_url: sort_url(&query, SortKey::Date, sort_key, sort_order),
        amount_sort_url: sort_url(&query, SortKey::Amount, sort_key, sort_order),
        filters: FilterFormModel {
            preset: query.range.unwrap_or_default(),
            start: query.start,
            end: query.end,
            category_value: query.category.clone().unwrap_or_else(|| "all".to_owned()),
            currency_value: query.currency.clone().unwrap_or_else(|| "all".to_owned()),
            account_value: query.account.clone().unwrap_or_else(|| "all".to_owned()),
            search: query.search.clone().unwrap_or_default(),
            amount_mode: query.amount.clone().unwrap_or_else(|| "all".to_owned()),
            amount_value: query.amount_value,
            accounts,
        },
        all_on_page_selected,
    };

    Ok(transactions_view(model).into_response())
}

/// Turn the raw query parameters into concrete filter criteria.
///
/// The "all" sentinel (and any unrecognized value) disables the
/// corresponding predicate, an empty search imposes no constraint, and an
/// amount comparison without a threshold is ignored.
fn build_criteria(query: &LedgerQuery, today: Date) -> FilterCriteria {
    let preset = query.range.unwrap_or_default();
    let date = resolve_date_bounds(preset, query.start, query.end, today);

    let comparison = match query.amount.as_deref() {
        Some("more-than") => Some(AmountComparison::MoreThan),
        Some("less-than") => Some(AmountComparison::LessThan),
        _ => None,
    };
    let amount = match (comparison, query.amount_value) {
        (Some(comparison), Some(value)) => Some(AmountFilter { comparison, value }),
        _ => None,
    };

    FilterCriteria {
        date,
        category: query
            .category
            .as_deref()
            .and_then(Category::from_query_value),
        currency: query.currency.as_deref().and_then(Currency::from_code),
        account_id: query.account.as_deref().and_then(|value| value.parse().ok()),
        search: query
            .search
            .clone()
            .filter(|search| !search.trim().is_empty()),
        amount,
    }
}

fn format_totals(transactions: &[super::core::Transaction]) -> Vec<String> {
    aggregate_by_currency(transactions)
        .into_iter()
        .map(|(currency, total)| crate::html::format_amount(currency, total))
        .collect()
}

/// The non-page query parameters, used to build links that keep the current
/// filters.
fn to_query_pairs(query: &LedgerQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    if let Some(range) = query.range {
        pairs.push(("range", range.as_query_value().to_owned()));
    }
    if let Some(start) = query.start {
        pairs.push(("start", start.to_string()));
    }
    if let Some(end) = query.end {
        pairs.push(("end", end.to_string()));
    }
    if let Some(category) = &query.category {
        pairs.push(("category", category.clone()));
    }
    if let Some(currency) = &query.currency {
        pairs.push(("currency", currency.clone()));
    }
    if let Some(account) = &query.account {
        pairs.push(("account", account.clone()));
    }
    if let Some(search) = &query.search {
        if !search.is_empty() {
            pairs.push(("search", search.clone()));
        }
    }
    if let Some(amount) = &query.amount {
        pairs.push(("amount", amount.clone()));
    }
    if let Some(amount_value) = query.amount_value {
        pairs.push(("amount_value", amount_value.to_string()));
    }
    if let Some(sort) = query.sort {
        pairs.push(("sort", sort.as_query_value().to_owned()));
    }
    if let Some(order) = query.order {
        pairs.push(("order", order.as_query_value().to_owned()));
    }

    pairs
}

fn page_url(base_pairs: &[(&'static str, String)], page: u64) -> String {
    let mut pairs = base_pairs.to_vec();
    pairs.push(("page", page.to_string()));

    encode_url(&pairs)
}

/// Build the link for a sortable column header.
///
/// Clicking the active column flips the direction, clicking the other column
/// switches to it in the default (descending) direction. Sorting resets to
/// the first page.
fn sort_url(
    query: &LedgerQuery,
    target: SortKey,
    active_key: SortKey,
    active_order: SortOrder,
) -> String {
    let order = if target == active_key {
        active_order.reversed()
    } else {
        SortOrder::default()
    };

    let mut pairs: Vec<(&'static str, String)> = to_query_pairs(query)
        .into_iter()
        .filter(|(key, _)| *key != "sort" && *key != "order")
        .collect();
    pairs.push(("sort", target.as_query_value().to_owned()));
    pairs.push(("order", order.as_query_value().to_owned()));

    encode_url(&pairs)
}

fn encode_url(pairs: &[(&'static str, String)]) -> String {
    match serde_urlencoded::to_string(pairs) {
        Ok(query) if !query.is_empty() => {
            format!("{}?{}", endpoints::TRANSACTIONS_VIEW, query)
        }
        Ok(_) => endpoints::TRANSACTIONS_VIEW.to_owned(),
        Err(error) => {
            tracing::error!("could not encode ledger query params: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod build_criteria_tests {
    use time::macros::date;

    use crate::{
        currency::Currency,
        transaction::core::{Category, ExpenseCategory},
        transaction::criteria::{AmountComparison, FilterCriteria},
        transaction::range::DatePreset,
    };

    use super::{LedgerQuery, build_criteria};

    const TODAY: time::Date = date!(2024 - 06 - 15);

    #[test]
    fn empty_query_defaults_to_this_month_and_no_predicates() {
        let got = build_criteria(&LedgerQuery::default(), TODAY);

        assert_eq!(got.date.start, Some(date!(2024 - 06 - 01)));
        assert_eq!(got.date.end, Some(date!(2024 - 06 - 30)));
        assert_eq!(
            FilterCriteria {
                date: got.date,
                ..Default::default()
            },
            got
        );
    }

    #[test]
    fn all_sentinels_disable_their_filters() {
        let query = LedgerQuery {
            range: Some(DatePreset::All),
            category: Some("all".to_owned()),
            currency: Some("all".to_owned()),
            account: Some("all".to_owned()),
            amount: Some("all".to_owned()),
            amount_value: Some(10.0),
            ..Default::default()
        };

        let got = build_criteria(&query, TODAY);

        assert_eq!(got, FilterCriteria::default());
    }

    #[test]
    fn recognized_values_become_predicates() {
        let query = LedgerQuery {
            range: Some(DatePreset::Custom),
            start: Some(date!(2024 - 03 - 01)),
            category: Some("expense-food".to_owned()),
            currency: Some("USD".to_owned()),
            account: Some("2".to_owned()),
            search: Some("grocer".to_owned()),
            amount: Some("more-than".to_owned()),
            amount_value: Some(10.0),
            ..Default::default()
        };

        let got = build_criteria(&query, TODAY);

        assert_eq!(got.date.start, Some(date!(2024 - 03 - 01)));
        assert_eq!(got.date.end, None);
        assert_eq!(got.category, Some(Category::Expense(ExpenseCategory::Food)));
        assert_eq!(got.currency, Some(Currency::Usd));
        assert_eq!(got.account_id, Some(2));
        assert_eq!(got.search, Some("grocer".to_owned()));
        let amount = got.amount.unwrap();
        assert_eq!(amount.comparison, AmountComparison::MoreThan);
        assert_eq!(amount.value, 10.0);
    }

    #[test]
    fn amount_comparison_without_value_is_ignored() {
        let query = LedgerQuery {
            amount: Some("less-than".to_owned()),
            ..Default::default()
        };

        let got = build_criteria(&query, TODAY);

        assert_eq!(got.amount, None);
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = LedgerQuery {
            search: Some("   ".to_owned()),
            ..Default::default()
        };

        let got = build_criteria(&query, TODAY);

        assert_eq!(got.search, None);
    }
}

#[cfg(test)]
mod page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use axum_extra::extract::Query;
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        account::{Account, append_account},
        currency::Currency,
        db::initialize,
        pagination::PaginationConfig,
        transaction::core::{Category, ExpenseCategory, IncomeCategory, Transaction},
        transaction::range::DatePreset,
        transaction::store::append_transaction,
    };

    use super::{LedgerQuery, TransactionsViewState, get_transactions_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn get_test_state(conn: Connection) -> TransactionsViewState {
        TransactionsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            pagination_config: PaginationConfig::default(),
        }
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    fn transaction_rows(html: &Html) -> Vec<ElementRef<'_>> {
        html.select(&Selector::parse("tbody tr[data-transaction-row='true']").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn displays_all_time_transactions() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        for i in 1..=3 {
            append_transaction(
                Transaction::build(
                    i as f64,
                    Currency::Usd,
                    Category::Expense(ExpenseCategory::Food),
                    1,
                    date!(2024 - 06 - 01),
                ),
                &conn,
            )
            .unwrap();
        }

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        let rows = transaction_rows(&html);
        assert_eq!(rows.len(), 3, "want 3 transaction rows, got {}", rows.len());
    }

    #[tokio::test]
    async fn search_filter_narrows_rows() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        append_transaction(
            Transaction::build(
                50.0,
                Currency::Usd,
                Category::Expense(ExpenseCategory::Food),
                1,
                date!(2024 - 06 - 01),
            )
            .description("Groceries"),
            &conn,
        )
        .unwrap();
        append_transaction(
            Transaction::build(
                12.0,
                Currency::Usd,
                Category::Expense(ExpenseCategory::Entertainment),
                1,
                date!(2024 - 06 - 03),
            )
            .description("Movie"),
            &conn,
        )
        .unwrap();

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                search: Some("grocer".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        let rows = transaction_rows(&html);
        assert_eq!(rows.len(), 1, "want 1 matching row, got {}", rows.len());
        let row_text = rows[0].text().collect::<String>();
        assert!(
            row_text.contains("Groceries"),
            "want row with Groceries, got {row_text}"
        );
    }

    #[tokio::test]
    async fn totals_cover_full_filtered_set_not_just_page() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        // 25 expenses of 1 USD, only 20 fit on the first page.
        for _ in 0..25 {
            append_transaction(
                Transaction::build(
                    1.0,
                    Currency::Usd,
                    Category::Expense(ExpenseCategory::Other),
                    1,
                    date!(2024 - 06 - 01),
                ),
                &conn,
            )
            .unwrap();
        }

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        assert_eq!(transaction_rows(&html).len(), 20);
        let totals = html
            .select(&Selector::parse("[data-expense-totals]").unwrap())
            .next()
            .expect("No expense totals found")
            .text()
            .collect::<String>();
        assert!(
            totals.contains("USD 25.00"),
            "want totals over all 25 records, got {totals}"
        );
    }

    #[tokio::test]
    async fn expense_and_income_totals_are_separate() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        append_transaction(
            Transaction::build(
                50.0,
                Currency::Usd,
                Category::Expense(ExpenseCategory::Food),
                1,
                date!(2024 - 06 - 01),
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
                date!(2024 - 06 - 28),
            ),
            &conn,
        )
        .unwrap();

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let expense_totals = html
            .select(&Selector::parse("[data-expense-totals]").unwrap())
            .next()
            .expect("No expense totals found")
            .text()
            .collect::<String>();
        let income_totals = html
            .select(&Selector::parse("[data-income-totals]").unwrap())
            .next()
            .expect("No income totals found")
            .text()
            .collect::<String>();
        assert!(expense_totals.contains("USD 50.00"));
        assert!(income_totals.contains("USD 1,200.00"));
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        for _ in 0..3 {
            append_transaction(
                Transaction::build(
                    1.0,
                    Currency::Usd,
                    Category::Expense(ExpenseCategory::Other),
                    1,
                    date!(2024 - 06 - 01),
                ),
                &conn,
            )
            .unwrap();
        }

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                page: Some(7),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        // All 3 records fit on a single page, so the request lands there.
        assert_eq!(transaction_rows(&html).len(), 3);
    }

    #[tokio::test]
    async fn empty_ledger_shows_empty_state() {
        let conn = get_test_connection();

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        html.select(&Selector::parse("td[data-empty-state='true']").unwrap())
            .next()
            .expect("No empty-state row found");
    }

    #[tokio::test]
    async fn unknown_account_gets_fallback_label() {
        let conn = get_test_connection();
        append_transaction(
            Transaction::build(
                5.0,
                Currency::Usd,
                Category::Expense(ExpenseCategory::Other),
                99,
                date!(2024 - 06 - 01),
            ),
            &conn,
        )
        .unwrap();

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let rows = transaction_rows(&html);
        let row_text = rows[0].text().collect::<String>();
        assert!(
            row_text.contains("Unknown account"),
            "want fallback account label, got {row_text}"
        );
    }

    #[tokio::test]
    async fn selected_ids_mark_rows_and_header_checkbox() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();
        let mut ids = Vec::new();
        for _ in 0..2 {
            let transaction = append_transaction(
                Transaction::build(
                    1.0,
                    Currency::Usd,
                    Category::Expense(ExpenseCategory::Other),
                    1,
                    date!(2024 - 06 - 01),
                ),
                &conn,
            )
            .unwrap();
            ids.push(transaction.id);
        }

        let response = get_transactions_page(
            State(get_test_state(conn)),
            Query(LedgerQuery {
                range: Some(DatePreset::All),
                selected: ids,
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let checked_rows = html
            .select(&Selector::parse("input[name='selected'][checked]").unwrap())
            .count();
        assert_eq!(checked_rows, 2);
        html.select(&Selector::parse("input[data-select-all][checked]").unwrap())
            .next()
            .expect("Select-all checkbox should be checked when every row is selected");
    }
}
