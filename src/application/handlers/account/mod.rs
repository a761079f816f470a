//! Account handlers.

mod delete_account;

pub use delete_account::{DeleteAccountCommand, DeleteAccountHandler, DeleteAccountResult};
