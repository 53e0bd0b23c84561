//! Liveness endpoint.

use axum::Json;
use serde_json::{Value, json};

/// Reports service liveness.
///
/// # Endpoint
///
/// `GET /health`
///
/// The service holds no connections or state worth probing, so this is a
/// plain liveness check.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
