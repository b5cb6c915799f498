//! Defines the endpoint for invoicing incomes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// axum's Form cannot collect repeated keys into a Vec.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    invoice::create_invoice,
    profile::Session,
    timezone::local_today,
    transaction::TransactionId,
    view::{InvalidateView, ViewVersions},
};

/// The state needed to create an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
    /// The local timezone as a canonical timezone name, used to date the invoice.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateInvoiceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The incomes selected on the invoices page.
#[derive(Debug, Deserialize)]
pub struct InvoiceForm {
    /// The IDs of the checked incomes, one per repeated `income_id` key.
    #[serde(default)]
    pub income_id: Vec<TransactionId>,
}

/// Invoice the selected incomes of the active profile, dated today.
pub async fn create_invoice_endpoint(
    State(state): State<CreateInvoiceState>,
    Extension(session): Extension<Session>,
    Form(form): Form<InvoiceForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_invoice(session.profile_id, &form.income_id, today, &connection) {
        Ok(invoice) => {
            tracing::info!(
                "Created invoice {} for profile {} totalling {}",
                invoice.id,
                invoice.profile_id,
                invoice.total
            );

            state.views.invalidate(endpoints::INVOICES_VIEW);
            state.views.invalidate(endpoints::HOME_VIEW);

            (
                HxRedirect(endpoints::INVOICES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::EmptyInvoice | Error::InvalidIncome(_))) => {
            tracing::warn!("Rejected invoice for profile {}: {error}", session.profile_id);
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an invoice: {error}");
            error.into_alert_response()
        }
    }
}
