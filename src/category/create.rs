//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryName, create_category, domain::CategoryFormData},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    profile::Session,
    view::ViewVersions,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub views: Arc<ViewVersions>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            views: state.views.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page() -> Response {
    new_category_view().into_response()
}

/// Handle category creation form submission for the active profile.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Extension(session): Extension<Session>,
    Form(new_category): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&new_category.name) {
        Ok(name) => name,
        Err(error) => {
            return new_category_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category(name, session.profile_id, &connection, state.views.as_ref()) {
        Ok(category) => {
            tracing::info!(
                "Created category {} for profile {}",
                category.id,
                category.profile_id
            );

            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

fn new_category_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let form = new_category_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &content)
}

fn new_category_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CATEGORY)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Aluguel"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
        }
    }
}


#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
    };

    use crate::{
        category::{create_category_endpoint, domain::CategoryFormData, list_categories},
        endpoints,
        profile::{ProfileType, Session},
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, get_header,
            get_test_connection, must_create_profile, must_get_form, parse_html_fragment,
        },
        view::ViewVersions,
    };

    use super::CreateCategoryEndpointState;

    fn get_state() -> CreateCategoryEndpointState {
        let connection = get_test_connection();
        must_create_profile("Personal", ProfileType::Personal, &connection);

        CreateCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            views: Arc::new(ViewVersions::new()),
        }
    }

    #[tokio::test]
    async fn creates_category_for_session_profile() {
        let state = get_state();
        let form = CategoryFormData {
            name: " Mercado ".to_owned(),
        };

        let response = create_category_endpoint(
            State(state.clone()),
            Extension(Session { profile_id: 1 }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let categories = list_categories(Some(1), &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category.name.as_ref(), "Mercado");
        assert_eq!(state.views.version(endpoints::CATEGORIES_VIEW), 1);
    }

    #[tokio::test]
    async fn empty_name_renders_form_error() {
        let state = get_state();
        let form = CategoryFormData {
            name: "   ".to_owned(),
        };

        let response = create_category_endpoint(
            State(state.clone()),
            Extension(Session { profile_id: 1 }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
        assert_eq!(state.views.version(endpoints::CATEGORIES_VIEW), 0);
    }

    #[tokio::test]
    async fn missing_profile_returns_alert() {
        let state = get_state();
        let form = CategoryFormData {
            name: "Mercado".to_owned(),
        };

        let response = create_category_endpoint(
            State(state),
            Extension(Session { profile_id: 99 }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
