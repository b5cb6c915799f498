//! The page listing uninvoiced incomes and the invoices of the active profile.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::HeaderMap,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        empty_state, format_currency, primary_button,
    },
    invoice::{Invoice, get_invoices},
    navigation::NavBar,
    profile::{Profile, Session, get_profile},
    transaction::{Transaction, get_uninvoiced_incomes},
    view::{ViewVersions, is_fresh, not_modified, with_etag},
};

/// The state needed for the invoices page.
#[derive(Debug, Clone)]
pub struct InvoicesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
}

impl FromRef<AppState> for InvoicesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
        }
    }
}

/// Render the uninvoiced incomes with a form to invoice them, and the
/// existing invoices.
pub async fn get_invoices_page(
    State(state): State<InvoicesPageState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let etag = state
        .views
        .etag(endpoints::INVOICES_VIEW, &session.profile_id.to_string());

    if is_fresh(&headers, &etag) {
        return Ok(not_modified(&etag));
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let profile = get_profile(session.profile_id, &connection)?;
    let incomes = get_uninvoiced_incomes(session.profile_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve uninvoiced incomes: {error}"))?;
    let invoices = get_invoices(session.profile_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve invoices: {error}"))?;

    Ok(with_etag(&etag, invoices_view(&profile, &incomes, &invoices)))
}

fn uninvoiced_incomes_view(profile: &Profile, incomes: &[Transaction]) -> Markup {
    if incomes.is_empty() {
        return empty_state(
            "Nothing to invoice. Incomes you record will show up here.",
            Some((endpoints::NEW_TRANSACTION_VIEW, "Record an income")),
        );
    }

    html! {
        form
            hx-post=(endpoints::POST_INVOICE)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Select" } }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for income in incomes {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                input
                                    type="checkbox"
                                    name="income_id"
                                    value=(income.id)
                                    checked
                                    aria-label=(format!("Invoice {}", income.description));
                            }
                            td class=(TABLE_CELL_STYLE) { (income.date) }
                            td class=(TABLE_CELL_STYLE) { (income.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_currency(income.amount, &profile.currency))
                            }
                        }
                    }
                }
            }

            (primary_button("Create Invoice"))
        }
    }
}

fn issued_invoices_view(profile: &Profile, invoices: &[Invoice]) -> Markup {
    if invoices.is_empty() {
        return empty_state("No invoices yet.", None);
    }

    html! {
        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Invoice" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                }
            }

            tbody
            {
                @for invoice in invoices {
                    tr class=(TABLE_ROW_STYLE) data-invoice-id=(invoice.id)
                    {
                        td class=(TABLE_CELL_STYLE) { "#" (invoice.id) }
                        td class=(TABLE_CELL_STYLE) { (invoice.date) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (format_currency(invoice.total, &profile.currency))
                        }
                    }
                }
            }
        }
    }
}

fn invoices_view(profile: &Profile, incomes: &[Transaction], invoices: &[Invoice]) -> Markup {
    let nav_bar = NavBar::new(endpoints::INVOICES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-8"
            {
                section id="uninvoiced-incomes" class="space-y-4"
                {
                    h1 class="text-xl font-bold" { "Uninvoiced Incomes" }

                    (uninvoiced_incomes_view(profile, incomes))
                }

                section id="invoices" class="space-y-4"
                {
                    h2 class="text-xl font-bold" { "Invoices" }

                    (issued_invoices_view(profile, invoices))
                }
            }
        }
    };

    base("Invoices", &content)
}
