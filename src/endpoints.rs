//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}', use [format_endpoint].

/// The home page, a summary of the active profile.
pub const HOME_VIEW: &str = "/";
/// The page for choosing the active profile.
pub const SIGN_IN_VIEW: &str = "/sign_in";
/// The page listing all services.
pub const SERVICES_VIEW: &str = "/services";
/// The page for listing expense categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new expense category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing expense category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page listing uninvoiced incomes and invoices.
pub const INVOICES_VIEW: &str = "/invoices";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for choosing the active profile.
pub const SESSION: &str = "/api/session";
/// The route for the client to clear the active profile.
pub const SIGN_OUT: &str = "/api/sign_out";
/// The route to create an expense category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update an expense category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete an expense category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to create an invoice.
pub const POST_INVOICE: &str = "/api/invoices";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/categories/{category_id}', '{category_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
