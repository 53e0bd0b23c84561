//! Request parameters for the tracking endpoint.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

/// The `to` / `label` pair carried by a tracking request.
///
/// Extraction source is fixed per method and never mixed:
///
/// - `GET` reads the query string (via [`axum::extract::Query`])
/// - `POST` reads the body, JSON or urlencoded form selected by
///   `Content-Type` (via this type's [`FromRequest`] impl)
///
/// Both fields are untrusted input; `to` is validated by
/// [`crate::domain::destination::validate_destination`] and `label` is used
/// for display only.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TrackParams {
    pub to: Option<String>,
    pub label: Option<String>,
}

impl<S> FromRequest<S> for TrackParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::bad_request("Failed to read request body", json!({})))?;

        match content_type.as_str() {
            "application/json" => serde_json::from_slice(&bytes)
                .map_err(|_| AppError::bad_request("Malformed JSON body", json!({}))),
            "application/x-www-form-urlencoded" => serde_urlencoded::from_bytes(&bytes)
                .map_err(|_| AppError::bad_request("Malformed form body", json!({}))),
            other => Err(AppError::bad_request(
                "Unsupported Content-Type",
                json!({ "content_type": other }),
            )),
        }
    }
}
