//! Best-effort visit notifications.
//!
//! Delivery is fire-and-forget from the pipeline's point of view: exactly one
//! attempt per validated request, failures logged and swallowed by the
//! caller, never surfaced to the visitor. When credentials are not configured
//! the [`NoopNotifier`] stands in, mirroring how a disabled cache would be a
//! null implementation rather than a scattering of `if` checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::geo::LocationLabel;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification provider returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("notification provider rejected the message: {0}")]
    Provider(String),
}

/// Delivers a visit-summary message to the operator's notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Formats the visit-summary message: `"{location} - {label or destination}"`.
///
/// An empty label falls back to the destination so the operator always sees
/// what was clicked.
pub fn visit_message(location: &LocationLabel, label: Option<&str>, destination: &str) -> String {
    let subject = label.filter(|l| !l.is_empty()).unwrap_or(destination);
    format!("{} - {}", location, subject)
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Wire shape of the Telegram Bot API response envelope.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Notifier backed by the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier with a bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);

        let response = self
            .http
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        let body: TelegramResponse = response.json().await?;
        if !body.ok {
            return Err(NotifyError::Provider(
                body.description.unwrap_or_else(|| "no description".to_string()),
            ));
        }

        Ok(())
    }
}

/// Notifier used when credentials are not configured; drops every message.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        tracing::debug!("Notifications disabled; dropping visit message");
        Ok(())
    }
}
