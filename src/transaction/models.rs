//! Shared view-model structs for the transactions page.

use time::Date;

use crate::{
    account::Account,
    database_id::TransactionId,
    endpoints,
    html::format_amount,
    pagination::PaginationIndicator,
};

use super::{
    core::{Transaction, TransactionKind},
    range::DatePreset,
    selection::SelectionTracker,
    sort::{SortKey, SortOrder},
};

/// Renders a transaction as a table row.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct TransactionRow {
    /// The ID of the transaction.
    pub(crate) id: TransactionId,
    /// When the transaction happened.
    pub(crate) date: Date,
    /// A text description of what the transaction was for.
    pub(crate) description: String,
    /// The display label of the transaction's category.
    pub(crate) category_label: &'static str,
    /// Whether the transaction is an expense or an income.
    pub(crate) kind: TransactionKind,
    /// The name of the account the transaction was made against.
    pub(crate) account_name: String,
    /// The amount formatted with its currency code, e.g. "USD 50.00".
    pub(crate) amount: String,
    /// The page path to edit this transaction.
    pub(crate) edit_url: String,
    /// The API path to delete this transaction.
    pub(crate) delete_url: String,
    /// The API path to clone this transaction.
    pub(crate) clone_url: String,
    /// Whether this row is in the current selection.
    pub(crate) selected: bool,
}

impl TransactionRow {
    pub(crate) fn new_from_transaction(
        transaction: Transaction,
        accounts: &[Account],
        selection: &SelectionTracker,
    ) -> Self {
        let account_name = accounts
            .iter()
            .find(|account| account.id == transaction.account_id)
            .map(|account| account.name.clone())
            .unwrap_or_else(|| "Unknown account".to_owned());

        Self {
            id: transaction.id,
            date: transaction.date,
            selected: selection.contains(transaction.id),
            category_label: transaction.category.label(),
            kind: transaction.kind(),
            account_name,
            amount: format_amount(transaction.currency, transaction.amount),
            edit_url: endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id),
            clone_url: endpoints::format_endpoint(endpoints::CLONE_TRANSACTION, transaction.id),
            description: transaction.description,
        }
    }
}

/// The state of the filter form controls.
#[derive(Debug, Clone)]
pub(crate) struct FilterFormModel {
    /// The selected date preset.
    pub(crate) preset: DatePreset,
    /// The custom range start, if any.
    pub(crate) start: Option<Date>,
    /// The custom range end, if any.
    pub(crate) end: Option<Date>,
    /// The selected category query value, or "all".
    pub(crate) category_value: String,
    /// The selected currency code, or "all".
    pub(crate) currency_value: String,
    /// The selected account ID as a string, or "all".
    pub(crate) account_value: String,
    /// The current search text.
    pub(crate) search: String,
    /// The selected amount comparison query value, or "all".
    pub(crate) amount_mode: String,
    /// The current amount threshold, if any.
    pub(crate) amount_value: Option<f64>,
    /// The accounts available in the account filter dropdown.
    pub(crate) accounts: Vec<Account>,
}

/// A pagination indicator paired with the link it should navigate to.
///
/// The href is empty for indicators that do not link anywhere (the current
/// page and ellipses).
#[derive(Debug, PartialEq)]
pub(crate) struct IndicatorLink {
    pub(crate) indicator: PaginationIndicator,
    pub(crate) href: String,
}

/// Everything the transactions view needs to render.
pub(crate) struct LedgerViewModel {
    /// The rows on the current page.
    pub(crate) rows: Vec<TransactionRow>,
    /// Formatted per-currency expense totals over the full filtered set.
    pub(crate) expense_totals: Vec<String>,
    /// Formatted per-currency income totals over the full filtered set.
    pub(crate) income_totals: Vec<String>,
    /// The number of records that survived the filter.
    pub(crate) filtered_count: u64,
    /// The number of records in the store.
    pub(crate) total_count: usize,
    /// The pagination indicators with their links.
    pub(crate) indicators: Vec<IndicatorLink>,
    /// The active sort key.
    pub(crate) sort_key: SortKey,
    /// The active sort direction.
    pub(crate) sort_order: SortOrder,
    /// The link that toggles sorting by date.
    pub(crate) date_sort_url: String,
    /// The link that toggles sorting by amount.
    pub(crate) amount_sort_url: String,
    /// The state of the filter form.
    pub(crate) filters: FilterFormModel,
    /// Whether every row on the current page is selected.
    pub(crate) all_on_page_selected: bool,
}
