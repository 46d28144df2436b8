//! Defines the core data models for transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    currency::Currency,
    database_id::{AccountId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The direction of the money flow is carried by the [Category] (and through
/// it the [TransactionKind]), `amount` is always non-negative.
///
/// To create a new `Transaction`, use [Transaction::build] and
/// [append_transaction](super::store::append_transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction. Never negative.
    pub amount: f64,
    /// The currency the transaction was made in.
    pub currency: Currency,
    /// The ID of the account the transaction was made against.
    #[serde(rename = "accountId")]
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: String,
    /// What kind of expense or income this transaction is.
    ///
    /// Doubles as the expense/income discriminant, see [Category].
    #[serde(flatten)]
    pub category: Category,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        amount: f64,
        currency: Currency,
        category: Category,
        account_id: AccountId,
        date: Date,
    ) -> NewTransaction {
        NewTransaction {
            amount,
            currency,
            category,
            account_id,
            date,
            description: String::new(),
        }
    }

    /// Whether this transaction is an expense or an income.
    pub fn kind(&self) -> TransactionKind {
        self.category.kind()
    }
}

/// The data for a transaction that has not been persisted yet.
///
/// The store assigns the ID when the transaction is appended:
///
/// ```ignore
/// use time::macros::date;
///
/// let builder = Transaction::build(
///         45.99,
///         Currency::Usd,
///         Category::Expense(ExpenseCategory::Food),
///         1,
///         date!(2025 - 01 - 15),
///     )
///     .description("Coffee beans");
/// let transaction = append_transaction(builder, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// The amount of money spent or earned. Must be non-negative, the
    /// expense/income direction comes from `category`.
    pub amount: f64,
    /// The currency the transaction was made in.
    pub currency: Currency,
    /// What kind of expense or income this transaction is.
    pub category: Category,
    /// The ID of the account the transaction was made against.
    pub account_id: AccountId,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction, e.g. "Groceries".
    /// May be left empty.
    pub description: String,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// A partial set of field replacements for an existing transaction.
///
/// Fields left as `None` keep their current value. The transaction's ID and
/// kind (expense/income) cannot be changed, so a `category` replacement must
/// stay within the same category set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionChanges {
    /// Replace the amount.
    pub amount: Option<f64>,
    /// Replace the currency.
    pub currency: Option<Currency>,
    /// Replace the category. Must match the transaction's kind.
    pub category: Option<Category>,
    /// Move the transaction to a different account.
    pub account_id: Option<AccountId>,
    /// Replace the date.
    pub date: Option<Date>,
    /// Replace the description.
    pub description: Option<String>,
}

// ============================================================================
// CATEGORIES
// ============================================================================

/// Whether a transaction records money spent or money earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl TransactionKind {
    /// The display label for the kind, e.g. "Expense".
    pub fn label(self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }
}

/// The category of a transaction.
///
/// Expenses and incomes draw from two disjoint closed category sets, so the
/// category also discriminates the transaction type: a transaction with an
/// expense category that claims to be an income is unrepresentable.
///
/// Serialized as the pair of fields the persisted records carry, e.g.
/// `"type": "expense", "category": "Food"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "category", rename_all = "lowercase")]
pub enum Category {
    /// A category from the expense set.
    Expense(ExpenseCategory),
    /// A category from the income set.
    Income(IncomeCategory),
}

/// The closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Bills,
    Shopping,
    Other,
}

/// The closed set of income categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Investment,
    Gift,
    Other,
}

/// Every expense category, in display order.
pub const EXPENSE_CATEGORIES: [ExpenseCategory; 6] = [
    ExpenseCategory::Food,
    ExpenseCategory::Transport,
    ExpenseCategory::Entertainment,
    ExpenseCategory::Bills,
    ExpenseCategory::Shopping,
    ExpenseCategory::Other,
];

/// Every income category, in display order.
pub const INCOME_CATEGORIES: [IncomeCategory; 5] = [
    IncomeCategory::Salary,
    IncomeCategory::Freelance,
    IncomeCategory::Investment,
    IncomeCategory::Gift,
    IncomeCategory::Other,
];

impl ExpenseCategory {
    /// The display label for the category, e.g. "Food".
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Bills => "bills",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }
}

impl IncomeCategory {
    /// The display label for the category, e.g. "Salary".
    pub fn label(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investment => "Investment",
            Self::Gift => "Gift",
            Self::Other => "Other",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Investment => "investment",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }
}

impl Category {
    /// Whether this category belongs to the expense or income set.
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Expense(_) => TransactionKind::Expense,
            Self::Income(_) => TransactionKind::Income,
        }
    }

    /// The display label for the category, e.g. "Food".
    pub fn label(self) -> &'static str {
        match self {
            Self::Expense(category) => category.label(),
            Self::Income(category) => category.label(),
        }
    }

    /// The kind-qualified value used in query strings and form fields, e.g.
    /// "expense-food".
    ///
    /// The qualification is necessary because "Other" appears in both
    /// category sets.
    pub fn as_query_value(self) -> String {
        match self {
            Self::Expense(category) => format!("expense-{}", category.slug()),
            Self::Income(category) => format!("income-{}", category.slug()),
        }
    }

    /// Parse a category from its kind-qualified query value.
    ///
    /// Returns `None` for unrecognized values (including the "all" sentinel
    /// used to disable the category filter).
    pub fn from_query_value(value: &str) -> Option<Self> {
        if let Some(slug) = value.strip_prefix("expense-") {
            return EXPENSE_CATEGORIES
                .into_iter()
                .find(|category| category.slug() == slug)
                .map(Self::Expense);
        }

        if let Some(slug) = value.strip_prefix("income-") {
            return INCOME_CATEGORIES
                .into_iter()
                .find(|category| category.slug() == slug)
                .map(Self::Income);
        }

        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
