//! Finbook is a web app for managing the finances of personal and business
//! profiles: services, expense categories, transactions and invoices.
//!
//! This library provides a REST API that directly serves HTML pages, plus the
//! database operations shared with the maintenance binaries in `src/bin`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
pub mod category;
mod db;
mod endpoints;
mod home;
mod html;
mod internal_server_error;
pub mod invoice;
mod logging;
mod navigation;
mod not_found;
pub mod profile;
mod routing;
pub mod service;
mod timezone;
pub mod transaction;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response, transaction::TransactionId,
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
    /// An empty string was used to create an expense category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A string other than "personal" or "business" was used as a profile type.
    #[error("\"{0}\" is not a valid profile type")]
    InvalidProfileType(String),

    /// A string other than "income" or "expense" was used as a transaction kind.
    #[error("\"{0}\" is not a valid transaction kind")]
    InvalidTransactionKind(String),

    /// A row referenced another row that does not exist, e.g. an expense
    /// category whose profile ID does not match any profile.
    ///
    /// Referential integrity is enforced by the database, so this error is
    /// produced from the foreign key constraint failure.
    #[error("the referenced profile, category or invoice does not exist")]
    InvalidForeignKey,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A transaction amount that is not a finite number greater than zero.
    ///
    /// The direction of the money is given by the transaction kind, so amounts
    /// are always positive.
    #[error("{0} is not a valid amount, it must be greater than zero")]
    InvalidAmount(f64),

    /// The transaction ID used to create an invoice is not an uninvoiced
    /// income of the current profile.
    #[error("transaction {0} is not an uninvoiced income")]
    InvalidIncome(TransactionId),

    /// An invoice was requested without selecting any incomes.
    #[error("an invoice needs at least one income")]
    EmptyInvoice,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an expense category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete an expense category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
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
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction amount".to_owned(),
                    details: format!(
                        "{amount} is not a valid amount. Enter an amount greater than zero."
                    ),
                },
            ),
            Error::InvalidForeignKey => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid reference".to_owned(),
                    details: "The selected profile or category no longer exists. \
                        Try refreshing the page."
                        .to_owned(),
                },
            ),
            Error::InvalidIncome(transaction_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not create invoice".to_owned(),
                    details: format!(
                        "Transaction {transaction_id} is not an uninvoiced income. \
                        Try refreshing the page to see if it has already been invoiced."
                    ),
                },
            ),
            Error::EmptyInvoice => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Select at least one income to invoice.".to_owned(),
                },
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update category".to_owned(),
                    details: "The category could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                        Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status, alert).into_response()
    }
}
