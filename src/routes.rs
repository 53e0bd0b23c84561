//! Router configuration.
//!
//! # Route Structure
//!
//! - `GET  /api/track`  - Tracked redirect, parameters in the query string
//! - `POST /api/track`  - Tracked redirect, parameters in the body
//! - `GET  /health`     - Liveness check
//!
//! Any other method on `/api/track` receives `405 Method Not Allowed` from
//! axum's method routing.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Origin allow-list derived from the redirect allow-list;
//!   preflights terminate here without touching the pipeline

use axum::Router;
use axum::routing::get;

use crate::handlers::{health_handler, track_get, track_post};
use crate::middleware::{cors, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let allow_list = state.allow_list.clone();

    Router::new()
        .route("/api/track", get(track_get).post(track_post))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors::layer(allow_list))
        .layer(tracing::layer())
}
