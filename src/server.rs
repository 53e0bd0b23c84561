//! HTTP server initialization and runtime setup.
//!
//! Wires outbound HTTP clients, shared state, and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::allow_list::AllowList;
use crate::geo::{GeoResolver, IpApiClient};
use crate::notify::{NoopNotifier, Notifier, TelegramNotifier};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The destination allow-list
/// - The geolocation client (bounded timeout)
/// - The Telegram notifier, or a no-op stand-in when credentials are absent
/// - The Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - An outbound HTTP client cannot be constructed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let allow_list = Arc::new(AllowList::new(&config.allowed_hosts));

    let geo: Arc<dyn GeoResolver> = Arc::new(IpApiClient::new(
        &config.geo_api_url,
        Duration::from_millis(config.geo_timeout_ms),
    )?);

    let notifier: Arc<dyn Notifier> = match (&config.bot_token, &config.chat_id) {
        (Some(token), Some(chat_id)) => {
            tracing::info!("Notifications enabled (Telegram)");
            Arc::new(TelegramNotifier::new(
                &config.telegram_api_url,
                token,
                chat_id,
                Duration::from_millis(config.notify_timeout_ms),
            )?)
        }
        _ => {
            tracing::info!("Notifications disabled (NoopNotifier)");
            Arc::new(NoopNotifier)
        }
    };

    let state = AppState::new(allow_list, geo, notifier);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
