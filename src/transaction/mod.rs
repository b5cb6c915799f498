//! Income and expense transactions of a profile.

mod create_endpoint;
mod db;
mod domain;
mod new_page;

pub use db::{create_transaction, create_transaction_table, get_transaction, get_uninvoiced_incomes};
pub use domain::{NewTransaction, Transaction, TransactionId, TransactionKind};
pub(crate) use create_endpoint::create_transaction_endpoint;
pub(crate) use new_page::get_new_transaction_page;
