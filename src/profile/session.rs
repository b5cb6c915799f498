//! Resolves the active profile of a request from an encrypted cookie.
//!
//! Handlers behind [profile_guard] receive the active profile with
//! `Extension(session): Extension<Session>` instead of reading the cookie
//! themselves.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error, endpoints,
    profile::{ProfileId, get_profile},
};

pub(crate) const COOKIE_PROFILE_ID: &str = "profile_id";
/// How long a browser keeps the selected profile.
pub(crate) const PROFILE_COOKIE_DURATION: Duration = Duration::days(30);

/// The request-scoped context of a signed in client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The ID of the profile the client is acting as.
    pub profile_id: ProfileId,
}

/// Add the cookie selecting `profile_id` as the active profile.
pub(crate) fn set_profile_cookie(jar: PrivateCookieJar, profile_id: ProfileId) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_PROFILE_ID, profile_id.to_string()))
            .path("/")
            .max_age(PROFILE_COOKIE_DURATION)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Remove the active profile cookie.
pub(crate) fn clear_profile_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(COOKIE_PROFILE_ID).path("/"))
}

/// The ID of the active profile, or `None` if the client has not chosen one
/// or the cookie could not be read.
pub fn get_current_profile_id(jar: &PrivateCookieJar) -> Option<ProfileId> {
    let cookie = jar.get(COOKIE_PROFILE_ID)?;

    match cookie.value_trimmed().parse() {
        Ok(profile_id) => Some(profile_id),
        Err(error) => {
            tracing::warn!("Invalid profile ID cookie {:?}: {error}", cookie.value());
            None
        }
    }
}

/// The state needed for the profile guard.
#[derive(Debug, Clone)]
pub struct ProfileGuardState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection, used to check that the profile still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileGuardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ProfileGuardState> for Key {
    fn from_ref(state: &ProfileGuardState) -> Self {
        state.cookie_key.clone()
    }
}

#[inline]
async fn profile_guard_internal(
    state: ProfileGuardState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to sign in page.");
            return get_redirect(endpoints::SIGN_IN_VIEW);
        }
    };

    let Some(profile_id) = get_current_profile_id(&jar) else {
        return get_redirect(endpoints::SIGN_IN_VIEW);
    };

    let profile = match state.db_connection.lock() {
        Ok(connection) => get_profile(profile_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match profile {
        Ok(_) => {}
        Err(Error::NotFound) => {
            tracing::warn!("Profile {profile_id} from cookie no longer exists.");
            return get_redirect(endpoints::SIGN_IN_VIEW);
        }
        Err(error) => return error.into_response(),
    }

    parts.extensions.insert(Session { profile_id });

    next.run(Request::from_parts(parts, body)).await
}

/// Middleware function that checks for an active profile cookie.
/// The [Session] is placed into the request and the request executed normally
/// if the profile exists, otherwise a redirect to the sign in page is returned.
pub async fn profile_guard(
    State(state): State<ProfileGuardState>,
    request: Request,
    next: Next,
) -> Response {
    profile_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for an active profile cookie.
/// The [Session] is placed into the request and the request executed normally
/// if the profile exists, otherwise a HTMX redirect to the sign in page is returned.
pub async fn profile_guard_hx(
    State(state): State<ProfileGuardState>,
    request: Request,
    next: Next,
) -> Response {
    profile_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}


#[cfg(test)]
mod profile_guard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        extract::{Path, State},
        middleware,
        response::IntoResponse,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use axum_test::TestServer;
    use sha2::Digest;

    use crate::{
        endpoints,
        profile::{ProfileId, ProfileType, delete_profiles_by_type},
        test_utils::{get_test_connection, must_create_profile},
    };

    use super::{
        COOKIE_PROFILE_ID, ProfileGuardState, Session, profile_guard, profile_guard_hx,
        set_profile_cookie,
    };

    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";
    const TEST_SIGN_IN_ROUTE: &str = "/sign_in/{profile_id}";

    async fn test_handler(Extension(session): Extension<Session>) -> String {
        session.profile_id.to_string()
    }

    async fn stub_sign_in(
        State(state): State<ProfileGuardState>,
        Path(profile_id): Path<ProfileId>,
    ) -> impl IntoResponse {
        set_profile_cookie(PrivateCookieJar::new(state.cookie_key), profile_id)
    }

    fn get_state() -> ProfileGuardState {
        let hash = sha2::Sha512::digest("nafstenoas");
        let connection = get_test_connection();
        must_create_profile("Personal", ProfileType::Personal, &connection);

        ProfileGuardState {
            cookie_key: Key::from(&hash),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: ProfileGuardState) -> TestServer {
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), profile_guard))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, get(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        profile_guard_hx,
                    )),
            )
            .route(TEST_SIGN_IN_ROUTE, post(stub_sign_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let server = get_test_server(get_state());
        let response = server.post("/sign_in/1").await;
        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_PROFILE_ID);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("1");
    }

    #[tokio::test]
    async fn get_protected_route_without_cookie_redirects_to_sign_in() {
        let server = get_test_server(get_state());

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn get_protected_route_with_invalid_cookie_redirects_to_sign_in() {
        let server = get_test_server(get_state());

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_PROFILE_ID, "FOOBAR"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn get_protected_route_for_deleted_profile_redirects_to_sign_in() {
        let state = get_state();
        let server = get_test_server(state.clone());
        let cookie = server.post("/sign_in/1").await.cookie(COOKIE_PROFILE_ID);
        delete_profiles_by_type(ProfileType::Personal, &state.db_connection.lock().unwrap())
            .unwrap();

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn api_route_without_cookie_uses_hx_redirect() {
        let server = get_test_server(get_state());

        let response = server.get(TEST_API_ROUTE).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::SIGN_IN_VIEW);
    }
}
