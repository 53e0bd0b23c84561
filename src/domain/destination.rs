//! Destination validation: parsing `to` as an absolute URL and enforcing the
//! allow-list.

use thiserror::Error;
use url::Url;

use crate::domain::allow_list::{AllowList, normalize_host};

/// Typed validation failure for the `to` parameter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("missing \"to\" parameter")]
    Missing,
    #[error("invalid \"to\" URL")]
    Malformed,
    #[error("redirect target not allowed: {host}")]
    HostNotAllowed { host: String },
}

/// A destination that passed URL parsing and the allow-list check.
///
/// The raw input string is captured here at validation time and is the only
/// value later stages may redirect to; re-reading the unvalidated input would
/// let a bypass slip past the allow-list check.
#[derive(Debug, Clone)]
pub struct ValidatedDestination {
    raw: String,
    url: Url,
    host: String,
}

impl ValidatedDestination {
    /// The exact input string, used verbatim as the `Location` header.
    ///
    /// The parsed [`Url`] is not used here on purpose: `Url` re-serializes
    /// (adding trailing slashes, percent-encoding) and the redirect must
    /// preserve the caller's original form.
    pub fn location(&self) -> &str {
        &self.raw
    }

    /// The normalized (lowercased, `www.`-stripped) host.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Validates a raw destination string against the allow-list.
///
/// # Errors
///
/// - [`DestinationError::Missing`] if the string is empty
/// - [`DestinationError::Malformed`] if it does not parse as an absolute URL
///   with a host, or contains control characters
/// - [`DestinationError::HostNotAllowed`] if the normalized host is not an
///   exact member of the allow-list
pub fn validate_destination(
    raw: &str,
    allow_list: &AllowList,
) -> Result<ValidatedDestination, DestinationError> {
    if raw.is_empty() {
        return Err(DestinationError::Missing);
    }

    // `Url::parse` silently strips tabs and newlines; a raw string carrying
    // them would otherwise reach the Location header.
    if raw.chars().any(|c| c.is_ascii_control()) {
        return Err(DestinationError::Malformed);
    }

    let url = Url::parse(raw).map_err(|_| DestinationError::Malformed)?;

    let host = match url.host_str() {
        Some(h) => normalize_host(h),
        None => return Err(DestinationError::Malformed),
    };

    if !allow_list.contains(&host) {
        return Err(DestinationError::HostNotAllowed { host });
    }

    Ok(ValidatedDestination {
        raw: raw.to_string(),
        url,
        host,
    })
}
