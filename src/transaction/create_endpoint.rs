//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    category::{CategoryId, get_category},
    endpoints,
    profile::Session,
    timezone::local_today,
    transaction::{NewTransaction, TransactionKind, create_transaction},
    view::{InvalidateView, ViewVersions},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The views to invalidate once the transaction is stored.
    pub views: Arc<ViewVersions>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether this is an income or an expense.
    pub kind: TransactionKind,
    /// The value of the transaction, always positive.
    pub amount: f64,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The expense category of the transaction.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// A route handler for recording a transaction for the active profile,
/// redirects to the home page on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    if !(form.amount.is_finite() && form.amount > 0.0) {
        tracing::warn!("Tried to create a transaction with the amount {}", form.amount);

        return Error::InvalidAmount(form.amount).into_alert_response();
    }

    if form.date > today {
        tracing::error!("Tried to create a transaction with the future date {}", form.date);

        return Error::FutureDate(form.date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Some(category_id) = form.category_id {
        match get_category(category_id, &connection) {
            Ok(category) if category.profile_id == session.profile_id => {}
            Ok(_) | Err(Error::NotFound) => {
                tracing::warn!(
                    "Category {category_id} does not belong to profile {}",
                    session.profile_id
                );
                return Error::InvalidForeignKey.into_alert_response();
            }
            Err(error) => {
                tracing::error!("could not check category {category_id}: {error}");
                return error.into_alert_response();
            }
        }
    }

    let transaction = NewTransaction {
        kind: form.kind,
        amount: form.amount,
        date: form.date,
        description: form.description,
        profile_id: session.profile_id,
        category_id: form.category_id,
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    state.views.invalidate(endpoints::HOME_VIEW);
    state.views.invalidate(endpoints::INVOICES_VIEW);

    (
        HxRedirect(endpoints::HOME_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
