//! Finna is a web app for tracking personal expenses and income across
//! accounts and currencies.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod currency;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod shared_templates;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

use crate::{
    alert::AlertView,
    internal_server_error::{InternalServerError, render_internal_server_error},
    not_found::get_404_not_found_response,
    shared_templates::render,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A negative or non-finite amount was used to create or update a
    /// transaction.
    ///
    /// Amounts are always non-negative, the direction of the money flow is
    /// carried by the transaction type (expense or income).
    #[error("{0} is not a valid amount, amounts must be non-negative")]
    InvalidAmount(f64),

    /// A category from the wrong category set was used to update a
    /// transaction, e.g. an income category on an expense.
    ///
    /// The transaction type is fixed at creation, so updates must keep the
    /// category within the matching set.
    #[error("the category does not belong to the transaction's type")]
    CategoryMismatch,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The record set could not be serialized for persistence.
    ///
    /// This can only happen on the write path. Read-side failures are
    /// swallowed by the stores, which fall back to an empty record set.
    #[error("could not serialize the record set: {0}")]
    SerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The specified account name already exists in the store.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to update an account that does not exist.
    #[error("tried to update an account that is not in the store")]
    UpdateMissingAccount,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerError {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidAmount(amount) => render(
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Amounts must be non-negative."),
                ),
            ),
            Error::CategoryMismatch => render(
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid category",
                    "The category does not belong to the transaction's type. \
                    Expenses and incomes have separate category sets.",
                ),
            ),
            Error::UpdateMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertView::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::UpdateMissingAccount => render(
                StatusCode::NOT_FOUND,
                AlertView::error("Could not update account", "The account could not be found."),
            ),
            Error::DuplicateAccountName(name) => render(
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Duplicate Account Name",
                    &format!(
                        "The account {name} already exists. \
                        Choose a different account name, or edit or delete the existing account.",
                    ),
                ),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertView::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
