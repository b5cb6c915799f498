//! The page and endpoints for choosing or clearing the active profile.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, empty_state, logo},
    profile::{
        Profile, ProfileId, get_all_profiles, get_profile,
        session::{clear_profile_cookie, set_profile_cookie},
    },
};

/// The state needed for the sign in page and endpoint.
#[derive(Debug, Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for looking up profiles.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for choosing the active profile.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub profile_id: ProfileId,
}

/// Render the page listing the profiles the client can act as.
pub async fn get_sign_in_page(State(state): State<SignInState>) -> Result<Response, Error> {
    let profiles = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_profiles(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve profiles: {error}"))?
    };

    Ok(sign_in_view(&profiles).into_response())
}

/// Set the active profile cookie and redirect to the home page.
pub async fn sign_in_endpoint(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let profile = match state.db_connection.lock() {
        Ok(connection) => get_profile(form.profile_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match profile {
        Ok(profile) => {
            tracing::info!("Signed in as profile {} ({})", profile.id, profile.name);

            (
                set_profile_cookie(jar, profile.id),
                HxRedirect(endpoints::HOME_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::NotFound) => (
            StatusCode::NOT_FOUND,
            Alert::Error {
                message: "Could not sign in".to_owned(),
                details: "The profile could not be found. Try refreshing the page.".to_owned(),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while signing in as profile {}: {error}",
                form.profile_id
            );
            error.into_alert_response()
        }
    }
}

/// Clear the active profile and return to the sign in page.
pub async fn get_sign_out(jar: PrivateCookieJar) -> Response {
    (clear_profile_cookie(jar), Redirect::to(endpoints::SIGN_IN_VIEW)).into_response()
}

fn sign_in_view(profiles: &[Profile]) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            div class="my-6" { (logo()) }

            h1 class="text-xl font-bold mb-4" { "Choose a profile" }

            @if profiles.is_empty() {
                (empty_state(
                    "No profiles yet. Run the seed_profiles program to create the default profiles.",
                    None,
                ))
            }

            ul class="w-full space-y-3"
            {
                @for profile in profiles {
                    li
                    {
                        form
                            hx-post=(endpoints::SESSION)
                            hx-target-error="#alert-container"
                        {
                            input type="hidden" name="profile_id" value=(profile.id);

                            button type="submit" class=(BUTTON_PRIMARY_STYLE)
                            {
                                (profile.name) " (" (profile.profile_type) ", " (profile.currency) ")"
                            }
                        }
                    }
                }
            }
        }
    };

    base("Sign In", &content)
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::State,
        http::{StatusCode, header::SET_COOKIE},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use scraper::Selector;
    use sha2::Digest;

    use crate::{
        endpoints,
        profile::ProfileType,
        test_utils::{
            assert_hx_redirect, assert_valid_html, get_test_connection, must_create_profile,
            parse_html_document,
        },
    };

    use super::{SignInForm, SignInState, get_sign_in_page, get_sign_out, sign_in_endpoint};

    fn get_state() -> SignInState {
        let hash = sha2::Sha512::digest("nafstenoas");

        SignInState {
            cookie_key: Key::from(&hash),
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn page_lists_a_form_per_profile() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            must_create_profile("Personal", ProfileType::Personal, &connection);
            must_create_profile("Business", ProfileType::Business, &connection);
        }

        let response = get_sign_in_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let forms = html.select(&Selector::parse("form").unwrap()).count();
        assert_eq!(forms, 2);
    }

    #[tokio::test]
    async fn page_without_profiles_shows_empty_state() {
        let response = get_sign_in_page(State(get_state())).await.unwrap();

        let html = parse_html_document(response).await;
        let empty_state = html
            .select(&Selector::parse("[data-empty-state]").unwrap())
            .next();
        assert!(empty_state.is_some(), "want empty state, got none");
    }

    #[tokio::test]
    async fn sign_in_sets_cookie_and_redirects_home() {
        let state = get_state();
        let profile = must_create_profile(
            "Personal",
            ProfileType::Personal,
            &state.db_connection.lock().unwrap(),
        );
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = sign_in_endpoint(
            State(state),
            jar,
            Form(SignInForm {
                profile_id: profile.id,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::HOME_VIEW);
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn sign_in_with_unknown_profile_returns_not_found() {
        let state = get_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            sign_in_endpoint(State(state), jar, Form(SignInForm { profile_id: 99 })).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn sign_out_redirects_to_sign_in() {
        let jar = PrivateCookieJar::new(get_state().cookie_key);

        let response = get_sign_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::SIGN_IN_VIEW
        );
    }
}
