//! # linktrack
//!
//! A tracked outbound-link redirector built with Axum. Receives a click on a
//! shared link, validates the destination against a host allow-list, resolves
//! the visitor's approximate location from their IP address, delivers a
//! best-effort visit notification, and redirects the visitor.
//!
//! ## Architecture
//!
//! The request pipeline is strictly sequential and short-circuiting:
//!
//! 1. **Normalizer** ([`dto::track`], [`utils::client_ip`]) - extracts `to`,
//!    `label`, and the client IP from the inbound request
//! 2. **Validator** ([`domain::destination`]) - parses `to` as an absolute URL
//!    and enforces the allow-list; failure stops the pipeline with a 4xx
//! 3. **Enrichment** ([`geo`]) - resolves IP to a location label; any failure
//!    degrades to `"Unknown"` and never aborts the request
//! 4. **Notification** ([`notify`]) - delivers the visit summary; failures are
//!    logged and swallowed
//! 5. **Redirect** ([`handlers::track`]) - emits a 302 with caching disabled,
//!    unconditionally once validation passed
//!
//! ## Features
//!
//! - Host allow-listing with `www.` normalization
//! - Client IP extraction behind reverse proxies (`X-Forwarded-For`, `X-Real-IP`)
//! - Bounded timeouts on all outbound calls
//! - CORS with an origin allow-list derived from the redirect allow-list
//! - No database; the service is stateless across requests
//!
//! ## Quick Start
//!
//! ```bash
//! export ALLOWED_HOSTS="example.com,cv.example.net"
//! export BOT_TOKEN="123456:telegram-bot-token"   # Optional
//! export CHAT_ID="987654321"                     # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

pub use error::AppError;
pub use state::AppState;
