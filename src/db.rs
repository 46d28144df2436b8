//! The persistence substrate for the application's stores.
//!
//! Records are persisted as JSON blobs in a single key-value table, one blob
//! per record set (transactions, accounts). The stores in
//! [transaction](crate::transaction) and [account](crate::account) own the
//! keys and the (de)serialization, this module only moves blobs in and out of
//! SQLite.

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// Create the key-value table that backs the record stores.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Read the blob stored under `key`, or `None` if the key has never been
/// written.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn read_blob(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .prepare("SELECT value FROM store WHERE key = :key")?
        .query_row(&[(":key", key)], |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Overwrite the blob stored under `key`.
///
/// # Errors
/// Returns [Error::SqlError] if the write fails.
pub(crate) fn write_blob(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}
