//! CORS middleware with an origin allow-list derived from the redirect
//! allow-list.
//!
//! Browser preflights (`OPTIONS`) are answered by this layer directly and
//! never reach the tracking pipeline; success and error responses alike carry
//! the CORS headers so browser clients can read them.

use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::Url;

use crate::domain::allow_list::{AllowList, normalize_host};

/// Creates the CORS layer.
///
/// An `Origin` is allowed when its host, normalized the same way destination
/// hosts are, is a member of the allow-list. Scheme and port are not part of
/// the check; the allow-list is a set of bare hostnames.
pub fn layer(allow_list: Arc<AllowList>) -> CorsLayer {
    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _request_parts| {
        let Ok(origin_str) = origin.to_str() else {
            return false;
        };

        Url::parse(origin_str)
            .ok()
            .and_then(|u| u.host_str().map(normalize_host))
            .is_some_and(|host| allow_list.contains(&host))
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
