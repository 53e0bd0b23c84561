//! Client IP extraction from proxy headers.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Extracts the client IP from request headers, falling back to the peer
/// socket address.
///
/// Resolution order:
///
/// 1. First entry of `X-Forwarded-For` (comma-separated proxy chain; the first
///    token is the original client)
/// 2. `X-Real-IP`
/// 3. Transport-layer peer address
/// 4. Empty string
///
/// The returned value is untrusted display data, not an authenticated
/// identity; it is only used for best-effort geolocation.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.5, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_ip(&headers, None), "203.0.113.5");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}
