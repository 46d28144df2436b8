//! The closed set of currencies that transactions and accounts may use.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A currency code.
///
/// Totals are always kept separate per currency, amounts in different
/// currencies are never summed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum Currency {
    Ars,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
    Inr,
    Aud,
    Cad,
    Chf,
}

/// Every supported currency, in display order.
pub const CURRENCIES: [Currency; 10] = [
    Currency::Ars,
    Currency::Usd,
    Currency::Eur,
    Currency::Gbp,
    Currency::Jpy,
    Currency::Cny,
    Currency::Inr,
    Currency::Aud,
    Currency::Cad,
    Currency::Chf,
];

impl Currency {
    /// The ISO-like code for the currency, e.g. "USD".
    pub fn code(self) -> &'static str {
        match self {
            Self::Ars => "ARS",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cny => "CNY",
            Self::Inr => "INR",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
        }
    }

    /// Parse a currency from its code, e.g. "USD".
    ///
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        CURRENCIES
            .into_iter()
            .find(|currency| currency.code() == code)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
