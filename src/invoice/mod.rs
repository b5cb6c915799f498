//! Invoices bill a profile's uninvoiced incomes.

mod create_endpoint;
mod db;
mod domain;
mod invoices_page;

pub use db::{create_invoice, create_invoice_table, get_invoices};
pub use domain::{Invoice, InvoiceId};
pub(crate) use create_endpoint::create_invoice_endpoint;
pub(crate) use invoices_page::get_invoices_page;
