//! The predicate filter engine for the ledger.
//!
//! A [FilterCriteria] is a conjunction of optional predicates. Absent fields
//! impose no constraint, so the empty criteria matches every record.

use serde::{Deserialize, Serialize};

use crate::{currency::Currency, database_id::AccountId};

use super::{core::Category, core::Transaction, range::DateBounds};

/// How an amount threshold is compared against record amounts.
///
/// Both comparisons are strict: `more-than 10` excludes a record with amount
/// exactly 10 and includes 10.01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmountComparison {
    /// Keep records with amounts strictly greater than the threshold.
    MoreThan,
    /// Keep records with amounts strictly less than the threshold.
    LessThan,
}

/// An amount threshold predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountFilter {
    /// The comparison direction.
    pub comparison: AmountComparison,
    /// The threshold value.
    pub value: f64,
}

/// The set of active filter predicates applied in one ledger query.
///
/// All fields are optional and ANDed together, a record must satisfy every
/// active predicate to survive. The default criteria matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Keep records whose date falls within these bounds (inclusive).
    pub date: DateBounds,
    /// Keep records with exactly this category.
    pub category: Option<Category>,
    /// Keep records in exactly this currency.
    pub currency: Option<Currency>,
    /// Keep records made against exactly this account.
    pub account_id: Option<AccountId>,
    /// Keep records whose description contains this text
    /// (case-insensitive). An empty string imposes no constraint.
    pub search: Option<String>,
    /// Keep records whose amount passes this threshold.
    pub amount: Option<AmountFilter>,
}

/// Apply `criteria` to `transactions`, returning the surviving records.
///
/// The filter is pure and stable: the input is not mutated and survivors
/// keep their original relative order, no resorting happens here.
pub fn filter_transactions(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| matches(transaction, criteria))
        .cloned()
        .collect()
}

fn matches(transaction: &Transaction, criteria: &FilterCriteria) -> bool {
    if !criteria.date.contains(transaction.date) {
        return false;
    }

    if let Some(category) = criteria.category {
        if transaction.category != category {
            return false;
        }
    }

    if let Some(currency) = criteria.currency {
        if transaction.currency != currency {
            return false;
        }
    }

    if let Some(account_id) = criteria.account_id {
        if transaction.account_id != account_id {
            return false;
        }
    }

    if let Some(search) = &criteria.search {
        if !search.is_empty()
            && !transaction
                .description
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }
    }

    if let Some(amount) = criteria.amount {
        let passes = match amount.comparison {
            AmountComparison::MoreThan => transaction.amount > amount.value,
            AmountComparison::LessThan => transaction.amount < amount.value,
        };
        if !passes {
            return false;
        }
    }

    true
}

// ============================================================================
// TESTS
// ============================================================================
