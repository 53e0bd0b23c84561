//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `ALLOWED_HOSTS` - Comma-separated hostnames a redirect destination may
//!   point at (e.g., `example.com,cv.example.net`). Entries are lowercased and
//!   a leading `www.` is stripped, matching destination-host normalization.
//!
//! ## Optional Variables
//!
//! - `BOT_TOKEN` / `CHAT_ID` - Telegram credentials; both must be set to enable
//!   visit notifications. Absence disables notifications only, never redirects.
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `GEO_API_URL` - Geolocation provider base URL (default: `http://ip-api.com/json`)
//! - `GEO_TIMEOUT_MS` - Geolocation call timeout (default: 3000)
//! - `TELEGRAM_API_URL` - Notification provider base URL (default: `https://api.telegram.org`)
//! - `NOTIFY_TIMEOUT_MS` - Notification call timeout (default: 5000)

use anyhow::{Context, Result};
use std::env;

use crate::domain::allow_list::normalize_host;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Normalized hostnames a validated destination must match exactly.
    pub allowed_hosts: Vec<String>,
    /// Telegram bot credential. Notifications require both this and `chat_id`.
    pub bot_token: Option<String>,
    /// Telegram chat identifier receiving visit notifications.
    pub chat_id: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Base URL of the geolocation provider, IP appended as a path segment.
    pub geo_api_url: String,
    /// Upper bound for one geolocation lookup, in milliseconds.
    pub geo_timeout_ms: u64,
    /// Base URL of the notification provider.
    pub telegram_api_url: String,
    /// Upper bound for one notification delivery, in milliseconds.
    pub notify_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ALLOWED_HOSTS` is missing.
    pub fn from_env() -> Result<Self> {
        let allowed_hosts = Self::load_allowed_hosts()
            .context("Failed to load allow-list configuration")?;

        let bot_token = env::var("BOT_TOKEN").ok().filter(|v| !v.is_empty());
        let chat_id = env::var("CHAT_ID").ok().filter(|v| !v.is_empty());

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let geo_api_url =
            env::var("GEO_API_URL").unwrap_or_else(|_| "http://ip-api.com/json".to_string());

        let geo_timeout_ms = env::var("GEO_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3_000);

        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        let notify_timeout_ms = env::var("NOTIFY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5_000);

        Ok(Self {
            allowed_hosts,
            bot_token,
            chat_id,
            listen_addr,
            log_level,
            log_format,
            geo_api_url,
            geo_timeout_ms,
            telegram_api_url,
            notify_timeout_ms,
        })
    }

    /// Loads and normalizes the redirect allow-list from `ALLOWED_HOSTS`.
    ///
    /// Entries are comma-separated; whitespace around entries is ignored and
    /// empty entries are dropped.
    fn load_allowed_hosts() -> Result<Vec<String>> {
        let raw = env::var("ALLOWED_HOSTS").context("ALLOWED_HOSTS must be set")?;

        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(normalize_host)
            .collect())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `allowed_hosts` is empty after normalization
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - a timeout is zero or above 60000 ms
    /// - only one of `BOT_TOKEN` / `CHAT_ID` is set
    pub fn validate(&self) -> Result<()> {
        if self.allowed_hosts.is_empty() {
            anyhow::bail!("ALLOWED_HOSTS must contain at least one hostname");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.geo_api_url.starts_with("http://") && !self.geo_api_url.starts_with("https://") {
            anyhow::bail!(
                "GEO_API_URL must start with 'http://' or 'https://', got '{}'",
                self.geo_api_url
            );
        }

        if !self.telegram_api_url.starts_with("http://")
            && !self.telegram_api_url.starts_with("https://")
        {
            anyhow::bail!(
                "TELEGRAM_API_URL must start with 'http://' or 'https://', got '{}'",
                self.telegram_api_url
            );
        }

        if self.geo_timeout_ms == 0 || self.geo_timeout_ms > 60_000 {
            anyhow::bail!(
                "GEO_TIMEOUT_MS must be between 1 and 60000, got {}",
                self.geo_timeout_ms
            );
        }

        if self.notify_timeout_ms == 0 || self.notify_timeout_ms > 60_000 {
            anyhow::bail!(
                "NOTIFY_TIMEOUT_MS must be between 1 and 60000, got {}",
                self.notify_timeout_ms
            );
        }

        // A half-configured notifier would silently do nothing; reject it.
        match (&self.bot_token, &self.chat_id) {
            (Some(_), None) => anyhow::bail!("CHAT_ID must be set when BOT_TOKEN is set"),
            (None, Some(_)) => anyhow::bail!("BOT_TOKEN must be set when CHAT_ID is set"),
            _ => {}
        }

        Ok(())
    }

    /// Returns whether visit notifications are enabled.
    pub fn is_notification_enabled(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Allowed hosts: {}", self.allowed_hosts.join(", "));
        tracing::info!("  Geolocation: {} ({}ms)", self.geo_api_url, self.geo_timeout_ms);

        if let Some(ref token) = self.bot_token {
            tracing::info!(
                "  Notifications: enabled via {} (bot {})",
                self.telegram_api_url,
                mask_token(token)
            );
        } else {
            tracing::info!("  Notifications: disabled");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks a bot token for logging, keeping only the numeric bot id prefix.
///
/// Telegram tokens look like `123456:ABC-secret`; everything after the colon
/// is the secret part.
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{}:***", id),
        None => "***".to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base_config() -> Config {
        Config {
            allowed_hosts: vec!["example.com".to_string()],
            bot_token: None,
            chat_id: None,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            geo_api_url: "http://ip-api.com/json".to_string(),
            geo_timeout_ms: 3_000,
            telegram_api_url: "https://api.telegram.org".to_string(),
            notify_timeout_ms: 5_000,
        }
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123456:ABC-secret"), "123456:***");
        assert_eq!(mask_token("no-colon-token"), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        // Empty allow-list
        config.allowed_hosts.clear();
        assert!(config.validate().is_err());
        config.allowed_hosts = vec!["example.com".to_string()];

        // Invalid log format
        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        // Invalid listen address
        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        // Invalid provider URL
        config.geo_api_url = "ftp://ip-api.com".to_string();
        assert!(config.validate().is_err());
        config.geo_api_url = "http://ip-api.com/json".to_string();

        // Timeout bounds
        config.geo_timeout_ms = 0;
        assert!(config.validate().is_err());
        config.geo_timeout_ms = 3_000;

        config.notify_timeout_ms = 120_000;
        assert!(config.validate().is_err());
        config.notify_timeout_ms = 5_000;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_half_configured_notifier_rejected() {
        let mut config = base_config();

        config.bot_token = Some("123:abc".to_string());
        assert!(config.validate().is_err());

        config.chat_id = Some("42".to_string());
        assert!(config.validate().is_ok());
        assert!(config.is_notification_enabled());

        config.bot_token = None;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_allowed_hosts_normalizes_entries() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("ALLOWED_HOSTS", " WWW.Example.COM , other.com ,, ");
        }

        let hosts = Config::load_allowed_hosts().unwrap();
        assert_eq!(hosts, vec!["example.com".to_string(), "other.com".to_string()]);

        unsafe {
            env::remove_var("ALLOWED_HOSTS");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_allowed_hosts() {
        // SAFETY: Tests are run serially
        unsafe {
            env::remove_var("ALLOWED_HOSTS");
        }

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("ALLOWED_HOSTS", "example.com");
            env::remove_var("LISTEN");
            env::remove_var("GEO_API_URL");
            env::remove_var("GEO_TIMEOUT_MS");
            env::remove_var("BOT_TOKEN");
            env::remove_var("CHAT_ID");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.geo_api_url, "http://ip-api.com/json");
        assert_eq!(config.geo_timeout_ms, 3_000);
        assert_eq!(config.notify_timeout_ms, 5_000);
        assert!(!config.is_notification_enabled());

        unsafe {
            env::remove_var("ALLOWED_HOSTS");
        }
    }
}
