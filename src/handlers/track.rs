//! Handler for tracked outbound-link redirects.

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, warn};

use crate::domain::destination::{ValidatedDestination, validate_destination};
use crate::dto::track::TrackParams;
use crate::error::AppError;
use crate::geo::resolve_location;
use crate::notify::visit_message;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Tracks a click arriving via query string.
///
/// # Endpoint
///
/// `GET /api/track?to=<url>&label=<text>`
pub async fn track_get(
    State(state): State<AppState>,
    Query(params): Query<TrackParams>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    handle_track(state, headers, peer, params).await
}

/// Tracks a click arriving via JSON or form body.
///
/// # Endpoint
///
/// `POST /api/track` with `{"to": ..., "label": ...}` or the urlencoded
/// equivalent, selected by `Content-Type`.
pub async fn track_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    params: TrackParams,
) -> Result<Response, AppError> {
    handle_track(state, headers, peer, params).await
}

/// Runs the tracking pipeline for one request.
///
/// # Request Flow
///
/// 1. Validate `to` against the allow-list (hard failure, 400/403)
/// 2. Extract the client IP from proxy headers or the peer address
/// 3. Resolve the IP to a location label, degrading to `"Unknown"` on any
///    failure
/// 4. Deliver the visit notification; failures are logged and swallowed
/// 5. Emit a 302 redirect with caching disabled
///
/// Steps 3 and 4 can never fail the request: once validation passes, the
/// redirect is emitted regardless of third-party availability.
///
/// # Errors
///
/// Returns 400 for a missing or malformed `to`, 403 when the destination host
/// is not allow-listed. No outbound call is made on either path.
async fn handle_track(
    state: AppState,
    headers: HeaderMap,
    peer: SocketAddr,
    params: TrackParams,
) -> Result<Response, AppError> {
    let destination =
        validate_destination(params.to.as_deref().unwrap_or_default(), &state.allow_list)?;

    let ip = client_ip(&headers, Some(peer));
    debug!("Tracking visit from '{}' to {}", ip, destination.host());

    let location = resolve_location(state.geo.as_ref(), &ip).await;

    let text = visit_message(&location, params.label.as_deref(), destination.location());
    if let Err(e) = state.notifier.send(&text).await {
        warn!("Failed to deliver visit notification: {e}");
    }

    redirect_response(&destination)
}

/// Emits the redirect with caching disabled so every click reaches the
/// service instead of a browser cache.
///
/// The `Location` header carries the validated destination's original string
/// form verbatim.
fn redirect_response(destination: &ValidatedDestination) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(destination.location())
        .map_err(|_| AppError::bad_request("Invalid \"to\" URL", json!({ "parameter": "to" })))?;

    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(header::LOCATION, location);

    Ok(response)
}
