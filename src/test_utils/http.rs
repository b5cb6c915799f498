use axum::{body::Body, http::StatusCode, response::Response};

/// The value of `header_name`, panicking if it is missing or not visible ASCII.
#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let Some(value) = response.headers().get(header_name) else {
        panic!("response has no {header_name} header, got {:?}", response.headers());
    };

    match value.to_str() {
        Ok(value) => value.to_owned(),
        Err(error) => panic!("{header_name} header is not a string: {error}"),
    }
}

/// Assert that an htmx endpoint answered with a `See Other` redirect to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}
