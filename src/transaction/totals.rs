//! Per-currency totals over a filtered record set.

use std::collections::BTreeMap;

use crate::currency::Currency;

use super::core::Transaction;

/// Sum transaction amounts into one bucket per currency.
///
/// The totals cover exactly the records the caller supplies, so totals for a
/// ledger view must be computed over the full filtered set, not the visible
/// page. Amounts in different currencies are never summed together and a
/// currency with no records produces no bucket.
///
/// Sums are plain `f64` addition, rounding only happens at display time.
pub fn aggregate_by_currency(transactions: &[Transaction]) -> BTreeMap<Currency, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(transaction.currency).or_insert(0.0) += transaction.amount;
    }

    totals
}
