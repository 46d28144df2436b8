//! Store ID type definitions.

/// Alias for the integer type used for record IDs in the store.
pub type DatabaseId = i64;

/// The ID of a transaction.
pub type TransactionId = DatabaseId;

/// The ID of an account.
pub type AccountId = DatabaseId;
