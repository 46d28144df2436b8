//! Defines the account model and its blob-backed store.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    currency::Currency,
    database_id::AccountId,
    db::{read_blob, write_blob},
};

/// The fixed key the account blob is stored under.
const ACCOUNTS_KEY: &str = "finna_accounts";

/// A bank account, wallet or card that transactions are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account, e.g. "Checking Account".
    pub name: String,
    /// The account's home currency.
    pub currency: Currency,
    /// The account balance, if the user chose to track one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl Account {
    /// Create a new account.
    ///
    /// Shortcut for [NewAccount] for discoverability.
    pub fn build(name: &str, currency: Currency) -> NewAccount {
        NewAccount {
            name: name.to_owned(),
            currency,
            balance: None,
        }
    }
}

/// The data for an account that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The account's home currency.
    pub currency: Currency,
    /// The initial balance, if tracked.
    pub balance: Option<f64>,
}

impl NewAccount {
    /// Set the initial balance for the account.
    pub fn balance(mut self, balance: Option<f64>) -> Self {
        self.balance = balance;
        self
    }
}

/// A partial set of field replacements for an existing account.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccountChanges {
    /// Replace the display name.
    pub name: Option<String>,
    /// Replace the home currency.
    pub currency: Option<Currency>,
    /// Replace the balance. `Some(None)` clears a tracked balance.
    pub balance: Option<Option<f64>>,
}

/// Retrieve a snapshot of every persisted account.
///
/// Reads fail closed in the same way as the transaction store: a blob that
/// cannot be validated yields an empty set, logged and never surfaced.
///
/// # Errors
/// Returns [Error::SqlError] if the underlying read fails.
pub fn list_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    let Some(blob) = read_blob(ACCOUNTS_KEY, connection)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&blob) {
        Ok(accounts) => Ok(accounts),
        Err(error) => {
            tracing::error!(
                "could not validate the persisted accounts, treating the store as empty: {error}"
            );
            Ok(Vec::new())
        }
    }
}

/// Create a new account in the store from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - or [Error::SqlError] if there is an SQL error.
pub fn append_account(builder: NewAccount, connection: &Connection) -> Result<Account, Error> {
    let mut accounts = list_accounts(connection)?;

    if accounts.iter().any(|account| account.name == builder.name) {
        return Err(Error::DuplicateAccountName(builder.name));
    }

    let account = Account {
        id: next_id(&accounts),
        name: builder.name,
        currency: builder.currency,
        balance: builder.balance,
    };
    accounts.push(account.clone());
    save_accounts(&accounts, connection)?;

    Ok(account)
}

/// Retrieve an account from the store by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored account,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    list_accounts(connection)?
        .into_iter()
        .find(|account| account.id == id)
        .ok_or(Error::NotFound)
}

/// Merge `changes` into the account with `id`.
///
/// Returns whether an account was updated. An unknown `id` is a no-op, not
/// an error.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccountName] if renaming to a name another account has,
/// - or [Error::SqlError] if there is an SQL error.
pub fn update_account(
    id: AccountId,
    changes: AccountChanges,
    connection: &Connection,
) -> Result<bool, Error> {
    let mut accounts = list_accounts(connection)?;

    if let Some(name) = &changes.name {
        if accounts
            .iter()
            .any(|account| account.id != id && &account.name == name)
        {
            return Err(Error::DuplicateAccountName(name.clone()));
        }
    }

    let Some(account) = accounts.iter_mut().find(|account| account.id == id) else {
        return Ok(false);
    };

    if let Some(name) = changes.name {
        account.name = name;
    }
    if let Some(currency) = changes.currency {
        account.currency = currency;
    }
    if let Some(balance) = changes.balance {
        account.balance = balance;
    }

    save_accounts(&accounts, connection)?;

    Ok(true)
}

/// Delete the account with `id`.
///
/// Returns the number of accounts removed. An unknown `id` is a no-op, not
/// an error. Transactions referencing the account are left in place.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn remove_account(id: AccountId, connection: &Connection) -> Result<usize, Error> {
    let accounts = list_accounts(connection)?;
    let before = accounts.len();
    let remaining: Vec<Account> = accounts
        .into_iter()
        .filter(|account| account.id != id)
        .collect();
    let removed = before - remaining.len();

    if removed > 0 {
        save_accounts(&remaining, connection)?;
    }

    Ok(removed)
}

fn next_id(accounts: &[Account]) -> AccountId {
    accounts.iter().map(|account| account.id).max().unwrap_or(0) + 1
}

fn save_accounts(accounts: &[Account], connection: &Connection) -> Result<(), Error> {
    let blob = serde_json::to_string(accounts)
        .map_err(|error| Error::SerializationError(error.to_string()))?;

    write_blob(ACCOUNTS_KEY, &blob, connection)
}

#[cfg(test)]
mod store_tests {
    use rusqlite::Connection;

    use crate::{Error, currency::Currency, db::initialize};

    use super::{
        Account, AccountChanges, append_account, get_account, list_accounts, remove_account,
        update_account,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn append_then_list_round_trips() {
        let conn = get_test_connection();

        let account =
            append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();

        assert_eq!(list_accounts(&conn).unwrap(), vec![account]);
    }

    #[test]
    fn append_rejects_duplicate_name() {
        let conn = get_test_connection();
        append_account(Account::build("Checking Account", Currency::Usd), &conn).unwrap();

        let result = append_account(Account::build("Checking Account", Currency::Ars), &conn);

        assert_eq!(
            result,
            Err(Error::DuplicateAccountName("Checking Account".to_owned()))
        );
    }

    #[test]
    fn update_merges_partial_fields() {
        let conn = get_test_connection();
        let account = append_account(
            Account::build("Savings", Currency::Ars).balance(Some(100.0)),
            &conn,
        )
        .unwrap();

        let updated = update_account(
            account.id,
            AccountChanges {
                balance: Some(Some(250.5)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert!(updated);
        let got = get_account(account.id, &conn).unwrap();
        assert_eq!(got.balance, Some(250.5));
        assert_eq!(got.name, "Savings");
    }

    #[test]
    fn update_with_unknown_id_is_a_noop() {
        let conn = get_test_connection();

        let updated = update_account(42, AccountChanges::default(), &conn).unwrap();

        assert!(!updated);
    }

    #[test]
    fn remove_with_unknown_id_is_a_noop() {
        let conn = get_test_connection();
        append_account(Account::build("Savings", Currency::Ars), &conn).unwrap();

        let removed = remove_account(42, &conn).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(list_accounts(&conn).unwrap().len(), 1);
    }

    #[test]
    fn missing_balance_field_parses_as_untracked() {
        let conn = get_test_connection();
        crate::db::write_blob(
            super::ACCOUNTS_KEY,
            r#"[{"id": 1, "name": "Cash", "currency": "EUR"}]"#,
            &conn,
        )
        .unwrap();

        let got = list_accounts(&conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].balance, None);
    }
}
