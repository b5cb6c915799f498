//! Services listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        PAGE_CONTAINER_STYLE, PROFILE_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, empty_state, format_currency,
    },
    navigation::NavBar,
    service::{ServiceWithProfile, get_services},
};

/// The state needed for the services listing page.
#[derive(Debug, Clone)]
pub struct ServicesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ServicesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the services of every profile.
pub async fn get_services_page(State(state): State<ServicesPageState>) -> Result<Response, Error> {
    let services = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_services(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve services: {error}"))?
    };

    Ok(services_view(&services).into_response())
}

fn services_view(services: &[ServiceWithProfile]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SERVICES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Services" }

                @if services.is_empty() {
                    (empty_state("No services yet.", None))
                } @else {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Profile" }
                            }
                        }

                        tbody
                        {
                            @for row in services {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (row.service.name) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (row.service.description.as_deref().unwrap_or("-"))
                                    }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format_currency(row.service.price, &row.profile.currency))
                                    }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span class=(PROFILE_BADGE_STYLE) { (row.profile.name) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Services", &content)
}
