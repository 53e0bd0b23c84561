//! The redirect allow-list: the fixed set of hostnames a destination must
//! match to be considered safe.

use std::collections::HashSet;

/// Normalizes a hostname for allow-list comparison.
///
/// Lowercases the host and strips one leading `www.` literal prefix. Arbitrary
/// subdomains are not stripped; `api.example.com` stays distinct from
/// `example.com`.
///
/// # Examples
///
/// ```
/// use linktrack::domain::allow_list::normalize_host;
///
/// assert_eq!(normalize_host("WWW.Example.COM"), "example.com");
/// assert_eq!(normalize_host("api.example.com"), "api.example.com");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Immutable set of allowed destination hostnames.
///
/// Built once at startup from configuration and shared read-only across
/// requests; entries are normalized with [`normalize_host`] at construction so
/// membership checks are exact string matches.
#[derive(Debug, Clone)]
pub struct AllowList {
    hosts: HashSet<String>,
}

impl AllowList {
    /// Builds an allow-list, normalizing every entry.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| normalize_host(h.as_ref()))
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Returns whether the given **normalized** host is allowed.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }
}
