//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model with its closed category sets and the
//!   `NewTransaction` builder
//! - The blob-backed store for persisting, updating and deleting records
//! - The ledger engine: date-range resolution, predicate filtering,
//!   per-currency totals, stable sorting and selection tracking
//! - View handlers for the transaction-related web pages

mod clone_endpoint;
mod core;
mod create_endpoint;
mod criteria;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod models;
mod new_transaction_page;
mod range;
mod selection;
mod sort;
mod store;
mod totals;
mod transactions_page;
mod view;

pub use clone_endpoint::clone_transaction_endpoint;
pub use core::{Category, ExpenseCategory, IncomeCategory, NewTransaction, Transaction,
    TransactionKind};
pub use create_endpoint::create_transaction_endpoint;
pub use criteria::{AmountComparison, AmountFilter, FilterCriteria, filter_transactions};
pub use delete_endpoint::{delete_selected_transactions_endpoint, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use new_transaction_page::get_new_transaction_page;
pub use range::{DateBounds, DatePreset, resolve_date_bounds};
pub use selection::SelectionTracker;
pub use sort::{SortKey, SortOrder, sort_transactions};
pub use store::{append_transaction, list_transactions};
pub use totals::aggregate_by_currency;
pub use transactions_page::get_transactions_page;
