//! The blob-backed store for transactions.
//!
//! The full record set is persisted as one JSON array under a fixed key in
//! the key-value table. The store exclusively owns that blob: every consumer
//! gets a fresh snapshot from [list_transactions] and all writes go through
//! the functions in this module.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    db::{read_blob, write_blob},
};

use super::core::{NewTransaction, Transaction, TransactionChanges};

/// The fixed key the transaction blob is stored under.
const TRANSACTIONS_KEY: &str = "finna_transactions";

/// Retrieve a snapshot of every persisted transaction.
///
/// Reads fail closed: when the persisted blob cannot be parsed or any record
/// in it fails validation, the whole set is treated as empty rather than
/// returning a partial result. The failure is logged and never surfaced to
/// the caller. This is a documented contract of the store, not an accident.
///
/// # Errors
/// Returns [Error::SqlError] if the underlying read fails. Malformed data is
/// not an error, see above.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let Some(blob) = read_blob(TRANSACTIONS_KEY, connection)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&blob) {
        Ok(transactions) => Ok(transactions),
        Err(error) => {
            tracing::error!(
                "could not validate the persisted transactions, treating the store as empty: {error}"
            );
            Ok(Vec::new())
        }
    }
}

/// Create a new transaction in the store from a builder.
///
/// Assigns a fresh unique ID and returns the stored transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is an SQL error.
pub fn append_transaction(
    builder: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_finite() || builder.amount < 0.0 {
        return Err(Error::InvalidAmount(builder.amount));
    }

    let mut transactions = list_transactions(connection)?;
    let transaction = Transaction {
        id: next_id(&transactions),
        amount: builder.amount,
        currency: builder.currency,
        account_id: builder.account_id,
        date: builder.date,
        description: builder.description,
        category: builder.category,
    };
    transactions.push(transaction.clone());
    save_transactions(&transactions, connection)?;

    Ok(transaction)
}

/// Retrieve a transaction from the store by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored transaction,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    list_transactions(connection)?
        .into_iter()
        .find(|transaction| transaction.id == id)
        .ok_or(Error::NotFound)
}

/// Merge `changes` into the transaction with `id`.
///
/// Returns whether a transaction was updated. An unknown `id` is a no-op,
/// not an error.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the replacement amount is negative or not finite,
/// - [Error::CategoryMismatch] if the replacement category belongs to the
///   other transaction kind (the kind is immutable),
/// - or [Error::SqlError] if there is an SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<bool, Error> {
    if let Some(amount) = changes.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }
    }

    let mut transactions = list_transactions(connection)?;
    let Some(transaction) = transactions
        .iter_mut()
        .find(|transaction| transaction.id == id)
    else {
        return Ok(false);
    };

    if let Some(category) = changes.category {
        if category.kind() != transaction.category.kind() {
            return Err(Error::CategoryMismatch);
        }
        transaction.category = category;
    }

    if let Some(amount) = changes.amount {
        transaction.amount = amount;
    }
    if let Some(currency) = changes.currency {
        transaction.currency = currency;
    }
    if let Some(account_id) = changes.account_id {
        transaction.account_id = account_id;
    }
    if let Some(date) = changes.date {
        transaction.date = date;
    }
    if let Some(description) = changes.description {
        transaction.description = description;
    }

    save_transactions(&transactions, connection)?;

    Ok(true)
}

/// Delete the transaction with `id`.
///
/// Returns the number of transactions removed. An unknown `id` is a no-op,
/// not an error.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn remove_transaction(id: TransactionId, connection: &Connection) -> Result<usize, Error> {
    remove_transactions(&[id], connection)
}

/// Delete every transaction whose ID is in `ids`.
///
/// Returns the number of transactions removed. IDs that are not in the store
/// are skipped, not an error.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn remove_transactions(
    ids: &[TransactionId],
    connection: &Connection,
) -> Result<usize, Error> {
    let transactions = list_transactions(connection)?;
    let before = transactions.len();
    let remaining: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| !ids.contains(&transaction.id))
        .collect();
    let removed = before - remaining.len();

    if removed > 0 {
        save_transactions(&remaining, connection)?;
    }

    Ok(removed)
}

/// Duplicate the transaction with `id`.
///
/// Copies every field except the ID and creates a fresh record, returning
/// the stored copy. Returns `None` if `id` does not refer to a stored
/// transaction.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn clone_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let mut transactions = list_transactions(connection)?;
    let Some(original) = transactions
        .iter()
        .find(|transaction| transaction.id == id)
        .cloned()
    else {
        return Ok(None);
    };

    let copy = Transaction {
        id: next_id(&transactions),
        ..original
    };
    transactions.push(copy.clone());
    save_transactions(&transactions, connection)?;

    Ok(Some(copy))
}

fn next_id(transactions: &[Transaction]) -> TransactionId {
    transactions
        .iter()
        .map(|transaction| transaction.id)
        .max()
        .unwrap_or(0)
        + 1
}

fn save_transactions(transactions: &[Transaction], connection: &Connection) -> Result<(), Error> {
    let blob = serde_json::to_string(transactions)
        .map_err(|error| Error::SerializationError(error.to_string()))?;

    write_blob(TRANSACTIONS_KEY, &blob, connection)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod store_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        currency::Currency,
        db::{initialize, write_blob},
        transaction::core::{Category, ExpenseCategory, IncomeCategory, Transaction,
            TransactionChanges},
    };

    use super::{
        TRANSACTIONS_KEY, append_transaction, clone_transaction, get_transaction,
        list_transactions, remove_transaction, remove_transactions, update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn groceries() -> crate::transaction::core::NewTransaction {
        Transaction::build(
            50.0,
            Currency::Usd,
            Category::Expense(ExpenseCategory::Food),
            1,
            date!(2024 - 06 - 01),
        )
        .description("Groceries")
    }

    #[test]
    fn list_is_empty_before_first_write() {
        let conn = get_test_connection();

        let got = list_transactions(&conn).unwrap();

        assert_eq!(got, Vec::new());
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let conn = get_test_connection();

        let first = append_transaction(groceries(), &conn).unwrap();
        let second = append_transaction(groceries(), &conn).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn append_rejects_negative_amount() {
        let conn = get_test_connection();
        let builder = Transaction::build(
            -5.0,
            Currency::Usd,
            Category::Expense(ExpenseCategory::Food),
            1,
            date!(2024 - 06 - 01),
        );

        let result = append_transaction(builder, &conn);

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn append_then_list_round_trips() {
        let conn = get_test_connection();

        let appended = append_transaction(groceries(), &conn).unwrap();
        let got = list_transactions(&conn).unwrap();

        assert_eq!(got, vec![appended]);
    }

    #[test]
    fn list_falls_back_to_empty_on_corrupt_blob() {
        let conn = get_test_connection();
        append_transaction(groceries(), &conn).unwrap();

        // A single malformed record hides the whole set, never a partial one.
        write_blob(TRANSACTIONS_KEY, "not json at all", &conn).unwrap();

        let got = list_transactions(&conn).unwrap();
        assert_eq!(got, Vec::new());
    }

    #[test]
    fn list_falls_back_to_empty_on_invalid_record() {
        let conn = get_test_connection();

        // An income category on an expense record fails validation.
        let blob = r#"[{
            "id": 1,
            "type": "expense",
            "category": "Salary",
            "amount": 10.0,
            "currency": "USD",
            "accountId": 1,
            "date": "2024-06-28"
        }]"#;
        write_blob(TRANSACTIONS_KEY, blob, &conn).unwrap();

        let got = list_transactions(&conn).unwrap();
        assert_eq!(got, Vec::new());
    }

    #[test]
    fn get_returns_not_found_for_unknown_id() {
        let conn = get_test_connection();

        let result = get_transaction(42, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_merges_partial_fields() {
        let conn = get_test_connection();
        let transaction = append_transaction(groceries(), &conn).unwrap();

        let updated = update_transaction(
            transaction.id,
            TransactionChanges {
                amount: Some(75.0),
                description: Some("Monthly shop".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert!(updated);
        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(got.amount, 75.0);
        assert_eq!(got.description, "Monthly shop");
        // Untouched fields keep their values.
        assert_eq!(got.currency, transaction.currency);
        assert_eq!(got.date, transaction.date);
        assert_eq!(got.category, transaction.category);
    }

    #[test]
    fn update_with_unknown_id_is_a_noop() {
        let conn = get_test_connection();
        append_transaction(groceries(), &conn).unwrap();

        let updated = update_transaction(
            42,
            TransactionChanges {
                amount: Some(75.0),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert!(!updated);
        let got = list_transactions(&conn).unwrap();
        assert_eq!(got[0].amount, 50.0);
    }

    #[test]
    fn update_rejects_category_from_the_wrong_set() {
        let conn = get_test_connection();
        let transaction = append_transaction(groceries(), &conn).unwrap();

        let result = update_transaction(
            transaction.id,
            TransactionChanges {
                category: Some(Category::Income(IncomeCategory::Salary)),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::CategoryMismatch));
    }

    #[test]
    fn remove_deletes_transaction() {
        let conn = get_test_connection();
        let transaction = append_transaction(groceries(), &conn).unwrap();

        let removed = remove_transaction(transaction.id, &conn).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(list_transactions(&conn).unwrap(), Vec::new());
    }

    #[test]
    fn remove_many_skips_absent_ids() {
        let conn = get_test_connection();
        let first = append_transaction(groceries(), &conn).unwrap();
        let second = append_transaction(groceries(), &conn).unwrap();

        let removed = remove_transactions(&[first.id, 999], &conn).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(list_transactions(&conn).unwrap(), vec![second]);
    }

    #[test]
    fn clone_copies_all_fields_except_id() {
        let conn = get_test_connection();
        let original = append_transaction(groceries(), &conn).unwrap();

        let copy = clone_transaction(original.id, &conn).unwrap().unwrap();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.amount, original.amount);
        assert_eq!(copy.currency, original.currency);
        assert_eq!(copy.category, original.category);
        assert_eq!(copy.account_id, original.account_id);
        assert_eq!(copy.date, original.date);
        assert_eq!(copy.description, original.description);
        assert_eq!(list_transactions(&conn).unwrap().len(), 2);
    }

    #[test]
    fn clone_of_unknown_id_returns_none() {
        let conn = get_test_connection();

        let got = clone_transaction(42, &conn).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn ids_stay_unique_after_deleting_the_newest_record() {
        let conn = get_test_connection();
        let first = append_transaction(groceries(), &conn).unwrap();
        let second = append_transaction(groceries(), &conn).unwrap();
        remove_transaction(second.id, &conn).unwrap();

        let third = append_transaction(groceries(), &conn).unwrap();

        assert_ne!(third.id, first.id);
    }
}
