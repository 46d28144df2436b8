//! Stable sorting for the ledger.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::core::Transaction;

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Sort by transaction date.
    #[default]
    Date,
    /// Sort by transaction amount.
    Amount,
}

impl SortKey {
    /// The value used for this key in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

/// The direction to sort transactions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value (most recent/largest first).
    #[default]
    Descending,
}

impl SortOrder {
    /// The value used for this order in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The opposite direction, used for the column header toggle links.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort `transactions` in place by `key` in the direction `order`.
///
/// The sort is stable: records that compare equal keep the relative order
/// they had in the input, so same-day (or same-amount) records do not jump
/// around between renders.
pub fn sort_transactions(transactions: &mut [Transaction], key: SortKey, order: SortOrder) {
    transactions.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => a.date.cmp(&b.date),
            // Amounts are finite (the store rejects NaN and infinities).
            SortKey::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
        };

        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
