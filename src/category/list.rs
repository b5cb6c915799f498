//! Expense categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::HeaderMap,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{CategoryWithProfile, list_categories},
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, PROFILE_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, empty_state,
    },
    navigation::NavBar,
    profile::{Profile, ProfileId, get_all_profiles},
    view::{ViewVersions, is_fresh, not_modified, with_etag},
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
        }
    }
}

/// The optional profile filter of the categories page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    /// Only show the categories of this profile.
    pub profile_id: Option<ProfileId>,
}

/// Render the categories of every profile, or of the profile in the query.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Query(query): Query<CategoriesQuery>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let variant = query
        .profile_id
        .map_or_else(|| "all".to_owned(), |profile_id| profile_id.to_string());
    let etag = state.views.etag(endpoints::CATEGORIES_VIEW, &variant);

    if is_fresh(&headers, &etag) {
        return Ok(not_modified(&etag));
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = list_categories(query.profile_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let profiles = get_all_profiles(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve profiles: {error}"))?;

    Ok(with_etag(
        &etag,
        categories_view(&categories, &profiles, query.profile_id),
    ))
}

fn filter_url(profile_id: ProfileId) -> String {
    match serde_urlencoded::to_string([("profile_id", profile_id)]) {
        Ok(query) => format!("{}?{query}", endpoints::CATEGORIES_VIEW),
        Err(error) => {
            tracing::warn!("Could not encode filter for profile {profile_id}: {error}");
            endpoints::CATEGORIES_VIEW.to_owned()
        }
    }
}

fn filter_link(url: &str, title: &str, is_current: bool) -> Markup {
    let style = if is_current {
        "font-semibold text-gray-900 dark:text-white"
    } else {
        LINK_STYLE
    };

    html!(
        a href=(url) class=(style) aria-current=[is_current.then_some("page")] { (title) }
    )
}

fn categories_view(
    categories: &[CategoryWithProfile],
    profiles: &[Profile],
    selected_profile: Option<ProfileId>,
) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryWithProfile| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, row.category.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, row.category.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its transactions will become uncategorized.",
            row.category.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-category-id=(row.category.id)
            {
                td class=(TABLE_CELL_STYLE) { (row.category.name) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(PROFILE_BADGE_STYLE) { (row.profile.name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expense Categories" }

                    a href=(new_category_route) class=(LINK_STYLE) { "Create Category" }
                }

                nav class="flex gap-4 text-sm" aria-label="Filter by profile"
                {
                    (filter_link(endpoints::CATEGORIES_VIEW, "All profiles", selected_profile.is_none()))

                    @for profile in profiles {
                        (filter_link(
                            &filter_url(profile.id),
                            &profile.name,
                            selected_profile == Some(profile.id),
                        ))
                    }
                }

                @if categories.is_empty() {
                    (empty_state(
                        "No categories yet.",
                        Some((new_category_route, "Create your first category")),
                    ))
                } @else {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Profile" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in categories {
                                (table_row(row))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &content)
}

#[cfg(test)]
mod categories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, HeaderValue, StatusCode, header::IF_NONE_MATCH},
    };
    use scraper::{Html, Selector};

    use crate::{
        category::{CategoryName, create_category},
        endpoints,
        profile::ProfileType,
        test_utils::{
            assert_valid_html, get_header, get_test_connection, must_create_profile,
            parse_html_document,
        },
        view::{InvalidateView, ViewVersions},
    };

    use super::{CategoriesPageState, CategoriesQuery, get_categories_page};

    fn get_state() -> CategoriesPageState {
        CategoriesPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            views: Arc::new(ViewVersions::new()),
        }
    }

    fn seed(state: &CategoriesPageState) {
        let connection = state.db_connection.lock().unwrap();
        let personal = must_create_profile("Personal", ProfileType::Personal, &connection);
        let business = must_create_profile("Business", ProfileType::Business, &connection);
        let views = state.views.as_ref();
        create_category(CategoryName::new_unchecked("Aluguel"), personal.id, &connection, views)
            .unwrap();
        create_category(CategoryName::new_unchecked("Luz"), business.id, &connection, views)
            .unwrap();
    }

    fn row_names(html: &Html) -> Vec<String> {
        let selector = Selector::parse("tbody tr td:first-child").unwrap();

        html.select(&selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_all_categories_by_default() {
        let state = get_state();
        seed(&state);

        let response = get_categories_page(
            State(state),
            Query(CategoriesQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(row_names(&html), ["Aluguel", "Luz"]);
    }

    #[tokio::test]
    async fn filters_by_profile() {
        let state = get_state();
        seed(&state);

        let response = get_categories_page(
            State(state),
            Query(CategoriesQuery {
                profile_id: Some(1),
            }),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(row_names(&html), ["Aluguel"]);
    }

    #[tokio::test]
    async fn rows_have_edit_and_delete_actions() {
        let state = get_state();
        seed(&state);

        let response = get_categories_page(
            State(state),
            Query(CategoriesQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let delete_button = html
            .select(&Selector::parse("tbody tr button[hx-delete]").unwrap())
            .next()
            .expect("No delete button found");
        assert_eq!(
            delete_button.value().attr("hx-delete"),
            Some(endpoints::format_endpoint(endpoints::DELETE_CATEGORY, 1).as_str())
        );
        let edit_link = html
            .select(&Selector::parse("tbody tr a").unwrap())
            .next()
            .expect("No edit link found");
        assert_eq!(edit_link.value().attr("href"), Some("/categories/1/edit"));
    }

    #[tokio::test]
    async fn shows_empty_state_without_categories() {
        let response = get_categories_page(
            State(get_state()),
            Query(CategoriesQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .next()
                .is_some()
        );
        assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());
    }

    #[tokio::test]
    async fn links_to_each_profile_filter() {
        let state = get_state();
        seed(&state);

        let response = get_categories_page(
            State(state),
            Query(CategoriesQuery {
                profile_id: Some(2),
            }),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let current = html
            .select(&Selector::parse("nav[aria-label] a[aria-current=page]").unwrap())
            .map(|link| link.value().attr("href").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(current, ["/categories?profile_id=2"]);
    }

    #[tokio::test]
    async fn reuses_rendering_until_invalidated() {
        let state = get_state();
        let first = get_categories_page(
            State(state.clone()),
            Query(CategoriesQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let etag = get_header(&first, "etag");
        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());

        let cached = get_categories_page(
            State(state.clone()),
            Query(CategoriesQuery::default()),
            headers.clone(),
        )
        .await
        .unwrap();
        assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

        state.views.invalidate(endpoints::CATEGORIES_VIEW);
        let refreshed = get_categories_page(
            State(state),
            Query(CategoriesQuery::default()),
            headers,
        )
        .await
        .unwrap();
        assert_eq!(refreshed.status(), StatusCode::OK);
    }
}
