//! Invalidation of rendered views.
//!
//! Mutating actions tell the rendering layer that the output previously
//! rendered for a view is stale through [InvalidateView]. The server's
//! implementation, [ViewVersions], keeps a version per view which pages turn
//! into an `ETag`, so clients only reuse a rendering until the view is
//! invalidated.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use axum::{
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    response::{IntoResponse, Response},
};
use maud::Markup;
use time::OffsetDateTime;

/// Marks the cached output of a view as stale.
///
/// `view` is the logical path of the page, e.g. `/categories`. Invalidation
/// cannot fail from the caller's point of view.
pub trait InvalidateView: Send + Sync {
    /// Signal that the rendering for `view` must be recomputed on next access.
    fn invalidate(&self, view: &str);
}

/// Per-view version counters used to validate cached renderings.
#[derive(Debug)]
pub struct ViewVersions {
    /// Distinguishes versions handed out by different server processes.
    epoch: i128,
    versions: Mutex<HashMap<String, u64>>,
}

impl ViewVersions {
    /// Create an empty set of view versions, all starting at zero.
    pub fn new() -> Self {
        Self {
            epoch: OffsetDateTime::now_utc().unix_timestamp_nanos(),
            versions: Mutex::new(HashMap::new()),
        }
    }

    /// The number of times `view` has been invalidated.
    pub fn version(&self, view: &str) -> u64 {
        let versions = self
            .versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        versions.get(view).copied().unwrap_or(0)
    }

    /// The entity tag for the current rendering of `view`.
    ///
    /// `variant` distinguishes renderings of the same view that depend on the
    /// request, e.g. the active profile or a query filter.
    pub fn etag(&self, view: &str, variant: &str) -> String {
        format!(
            "\"{view}:{variant}:{}:{}\"",
            self.epoch,
            self.version(view)
        )
    }
}

impl Default for ViewVersions {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidateView for ViewVersions {
    fn invalidate(&self, view: &str) {
        let mut versions = self
            .versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let version = versions.entry(view.to_owned()).or_insert(0);
        *version += 1;

        tracing::debug!("Invalidated view {view}, now at version {version}");
    }
}

/// Whether the client's `If-None-Match` header already names `etag`.
pub(crate) fn is_fresh(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| {
            let candidate = candidate.trim();
            candidate == "*" || candidate.trim_start_matches("W/") == etag
        })
}

/// Respond with `304 Not Modified` for a rendering the client still holds.
pub(crate) fn not_modified(etag: &str) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    insert_validator_headers(&mut response, etag);
    response
}

/// Respond with `markup`, tagged with `etag` so that the client revalidates it.
pub(crate) fn with_etag(etag: &str, markup: Markup) -> Response {
    let mut response = markup.into_response();
    insert_validator_headers(&mut response, etag);
    response
}

fn insert_validator_headers(response: &mut Response, etag: &str) {
    let headers = response.headers_mut();

    match HeaderValue::from_str(etag) {
        Ok(value) => {
            headers.insert(ETAG, value);
        }
        Err(error) => tracing::warn!("Could not use {etag} as an ETag: {error}"),
    }

    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
}
