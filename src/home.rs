//! The home page, a summary of the active profile.

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
    AppState, Error,
    category::count_categories,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, PROFILE_BADGE_STYLE, base, format_currency},
    navigation::NavBar,
    profile::{Profile, Session, get_profile},
    transaction::get_uninvoiced_incomes,
    view::{ViewVersions, is_fresh, not_modified, with_etag},
};

/// The state needed for the home page.
#[derive(Debug, Clone)]
pub struct HomePageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
}

impl FromRef<AppState> for HomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
        }
    }
}

struct HomeSummary {
    profile: Profile,
    category_count: i64,
    uninvoiced_count: usize,
    uninvoiced_total: f64,
}

/// Render the summary of the active profile.
pub async fn get_home_page(
    State(state): State<HomePageState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let etag = state
        .views
        .etag(endpoints::HOME_VIEW, &session.profile_id.to_string());

    if is_fresh(&headers, &etag) {
        return Ok(not_modified(&etag));
    }

    let summary = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let profile = get_profile(session.profile_id, &connection)?;
        let category_count = count_categories(profile.id, &connection)
            .inspect_err(|error| tracing::error!("Could not count categories: {error}"))?;
        let incomes = get_uninvoiced_incomes(profile.id, &connection)
            .inspect_err(|error| tracing::error!("Could not get uninvoiced incomes: {error}"))?;

        HomeSummary {
            profile,
            category_count,
            uninvoiced_count: incomes.len(),
            uninvoiced_total: incomes.iter().map(|income| income.amount).sum(),
        }
    };

    Ok(with_etag(&etag, home_view(&summary)))
}

fn summary_card(title: &str, value: &str, link: (&str, &str)) -> Markup {
    let (url, link_text) = link;

    html! {
        div
            class="rounded-lg border border-gray-200 bg-white p-6 shadow-sm
                dark:border-gray-700 dark:bg-gray-800"
            data-summary-card=(title)
        {
            h2 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="mt-2 text-2xl font-bold" { (value) }
            a href=(url) class=(LINK_STYLE) { (link_text) }
        }
    }
}

fn home_view(summary: &HomeSummary) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME_VIEW).into_html();
    let profile = &summary.profile;

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex items-center gap-3"
                {
                    h1 class="text-2xl font-bold" { (profile.name) }
                    span class=(PROFILE_BADGE_STYLE) { (profile.profile_type) }
                }

                div class="grid gap-4 md:grid-cols-2"
                {
                    (summary_card(
                        "Expense categories",
                        &summary.category_count.to_string(),
                        (endpoints::CATEGORIES_VIEW, "Manage categories"),
                    ))

                    (summary_card(
                        "Uninvoiced incomes",
                        &format!(
                            "{} ({})",
                            format_currency(summary.uninvoiced_total, &profile.currency),
                            summary.uninvoiced_count
                        ),
                        (endpoints::INVOICES_VIEW, "Create an invoice"),
                    ))
                }
            }
        }
    };

    base("Home", &content)
}
