//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    endpoints,
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    invoice::{create_invoice_endpoint, get_invoices_page},
    not_found::get_404_not_found,
    profile::{get_sign_in_page, get_sign_out, profile_guard, profile_guard_hx, sign_in_endpoint},
    service::get_services_page,
    transaction::{create_transaction_endpoint, get_new_transaction_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .route(endpoints::SESSION, post(sign_in_endpoint))
        .route(endpoints::SIGN_OUT, get(get_sign_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(endpoints::SERVICES_VIEW, get(get_services_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(endpoints::INVOICES_VIEW, get(get_invoices_page))
        .layer(middleware::from_fn_with_state(state.clone(), profile_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
            .route(
                endpoints::PUT_CATEGORY,
                put(update_category_endpoint).delete(delete_category_endpoint),
            )
            .route(
                endpoints::POST_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(endpoints::POST_INVOICE, post(create_invoice_endpoint))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                profile_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
