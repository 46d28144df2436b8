//! Account management for the expense tracker.
//!
//! Transactions reference accounts by ID. Deleting an account does not
//! cascade into the ledger, affected transactions simply show an unknown
//! account.

mod accounts_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;

pub use accounts_page::get_accounts_page;
pub use core::{Account, NewAccount, append_account, list_accounts};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_new_account_page;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use edit_page::get_edit_account_page;
