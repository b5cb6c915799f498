//! The page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::HeaderMap,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{CategoryWithProfile, list_categories},
    endpoints,
    html::{
        FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, primary_button,
    },
    navigation::NavBar,
    profile::Session,
    timezone::local_today,
    view::{ViewVersions, is_fresh, not_modified, with_etag},
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the form for recording a transaction for the active profile.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let Some(today) = local_today(&state.local_timezone) else {
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    // The maximum date in the form changes at midnight, so it is part of the tag.
    let variant = format!("{}:{today}", session.profile_id);
    let etag = state.views.etag(endpoints::NEW_TRANSACTION_VIEW, &variant);

    if is_fresh(&headers, &etag) {
        return Ok(not_modified(&etag));
    }

    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_categories(Some(session.profile_id), &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?
    };

    Ok(with_etag(&etag, new_transaction_view(today, &categories)))
}

fn kind_option(value: &str, label: &str, checked: bool) -> Markup {
    let id = format!("transaction-kind-{value}");

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(value)
                checked[checked]
                required
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

fn new_transaction_view(max_date: Date, categories: &[CategoryWithProfile]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_TRANSACTION)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                fieldset class="space-y-2"
                {
                    legend class=(FORM_LABEL_STYLE) { "Kind" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        (kind_option("expense", "Expense", true))
                        (kind_option("income", "Income", false))
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        max=(max_date)
                        value=(max_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if !categories.is_empty() {
                    div
                    {
                        label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                        select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" { "No category" }

                            @for row in categories {
                                option value=(row.category.id) { (row.category.name) }
                            }
                        }
                    }
                }

                (primary_button("Save Transaction"))
            }
        }
    };

    base("New Transaction", &content)
}

#[cfg(test)]
mod new_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::{HeaderMap, HeaderValue, StatusCode, header::IF_NONE_MATCH},
    };
    use scraper::Selector;

    use crate::{
        category::{CategoryName, create_category, delete_category},
        endpoints,
        profile::{ProfileType, Session},
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, get_header,
            get_test_connection, must_create_profile, must_get_form, parse_html_document,
        },
        view::ViewVersions,
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    fn get_state() -> NewTransactionPageState {
        let connection = get_test_connection();
        let views = ViewVersions::new();
        let personal = must_create_profile("Personal", ProfileType::Personal, &connection);
        let business = must_create_profile("Business", ProfileType::Business, &connection);
        create_category(CategoryName::new_unchecked("Luz"), personal.id, &connection, &views)
            .unwrap();
        create_category(CategoryName::new_unchecked("Software"), business.id, &connection, &views)
            .unwrap();

        NewTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            views: Arc::new(views),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn form_lists_only_session_profile_categories() {
        let response = get_new_transaction_page(
            State(get_state()),
            Extension(Session { profile_id: 1 }),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_TRANSACTION, "hx-post");
        assert_form_input(&form, "amount", "number", None);
        assert_form_input(&form, "date", "date", None);

        let options = form
            .select(&Selector::parse("select[name=category_id] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(options, ["No category", "Luz"]);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let mut state = get_state();
        state.local_timezone = "Not/A_Timezone".to_owned();

        let result = get_new_transaction_page(
            State(state),
            Extension(Session { profile_id: 1 }),
            HeaderMap::new(),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn deleting_a_category_refreshes_the_form() {
        let state = get_state();
        let first = get_new_transaction_page(
            State(state.clone()),
            Extension(Session { profile_id: 1 }),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            IF_NONE_MATCH,
            HeaderValue::from_str(&get_header(&first, "etag")).unwrap(),
        );

        let cached = get_new_transaction_page(
            State(state.clone()),
            Extension(Session { profile_id: 1 }),
            headers.clone(),
        )
        .await
        .unwrap();
        assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

        delete_category(1, &state.db_connection.lock().unwrap(), state.views.as_ref()).unwrap();

        let refreshed = get_new_transaction_page(
            State(state),
            Extension(Session { profile_id: 1 }),
            headers,
        )
        .await
        .unwrap();
        assert_eq!(refreshed.status(), StatusCode::OK);
    }
}
