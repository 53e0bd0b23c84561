//! Best-effort IP geolocation.
//!
//! Enrichment must never fail the pipeline: [`resolve_location`] converts
//! every failure mode (transport error, timeout, non-2xx, provider-reported
//! failure, undecodable body) into the fixed [`LocationLabel::unknown`]
//! fallback. At most one lookup attempt is made per request.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Fallback label when no location can be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// A human-readable location for a visit: a city, region, or country name, or
/// the literal `"Unknown"` fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLabel(String);

impl LocationLabel {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_LOCATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geolocation provider returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("geolocation provider reported a failed lookup")]
    ProviderFailure,
}

/// Resolves a client IP to a location label.
///
/// Implementations make at most one outbound call; retries and caching are
/// deliberately out of scope.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> Result<LocationLabel, GeoError>;
}

/// Wire shape of the ip-api.com JSON response.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default, rename = "regionName")]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl GeoResponse {
    /// Picks the most specific non-empty label: city, then region, then
    /// country.
    fn label(self) -> LocationLabel {
        [self.city, self.region_name, self.country]
            .into_iter()
            .flatten()
            .find(|v| !v.is_empty())
            .map(LocationLabel::new)
            .unwrap_or_else(LocationLabel::unknown)
    }
}

/// Geolocation client for the ip-api.com JSON endpoint.
///
/// Issues `GET {base}/{ip}?fields=status,city,regionName,country` with a
/// bounded timeout configured at construction.
pub struct IpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    /// Creates a client with the given provider base URL and per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoResolver for IpApiClient {
    async fn resolve(&self, ip: &str) -> Result<LocationLabel, GeoError> {
        let url = format!("{}/{}", self.base_url, ip);

        let response = self
            .http
            .get(&url)
            .query(&[("fields", "status,city,regionName,country")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status));
        }

        let body: GeoResponse = response.json().await?;
        if body.status != "success" {
            return Err(GeoError::ProviderFailure);
        }

        Ok(body.label())
    }
}

/// Returns whether an IP carries no useful geographic signal.
///
/// Empty and loopback addresses short-circuit to the fallback without an
/// outbound call.
pub fn is_unresolvable(ip: &str) -> bool {
    if ip.is_empty() {
        return true;
    }

    matches!(ip.parse::<IpAddr>(), Ok(addr) if addr.is_loopback())
}

/// Resolves a location with full failure isolation.
///
/// The lookup is skipped for unresolvable IPs; any resolver error is logged at
/// warn level and degraded to [`LocationLabel::unknown`]. This is the only
/// entry point the request pipeline uses.
pub async fn resolve_location(resolver: &dyn GeoResolver, ip: &str) -> LocationLabel {
    if is_unresolvable(ip) {
        return LocationLabel::unknown();
    }

    match resolver.resolve(ip).await {
        Ok(label) => label,
        Err(e) => {
            tracing::warn!("Geolocation lookup for {ip} failed: {e}");
            LocationLabel::unknown()
        }
    }
}
