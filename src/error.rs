use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::destination::DestinationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// HTTP-facing error type for the tracking pipeline.
///
/// Only validation failures and unexpected faults surface to the caller;
/// enrichment and notification failures are handled where they occur and never
/// become an `AppError`.
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Forbidden { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Forbidden { message, details } => {
                (StatusCode::FORBIDDEN, "forbidden", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DestinationError> for AppError {
    fn from(e: DestinationError) -> Self {
        match e {
            DestinationError::Missing => {
                AppError::bad_request("Missing \"to\" parameter", json!({ "parameter": "to" }))
            }
            DestinationError::Malformed => {
                AppError::bad_request("Invalid \"to\" URL", json!({ "parameter": "to" }))
            }
            DestinationError::HostNotAllowed { host } => {
                AppError::forbidden("Redirect target not allowed", json!({ "host": host }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_error_status_mapping() {
        let missing: AppError = DestinationError::Missing.into();
        assert_eq!(
            missing.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let malformed: AppError = DestinationError::Malformed.into();
        assert_eq!(
            malformed.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let not_allowed: AppError = DestinationError::HostNotAllowed {
            host: "evil.com".to_string(),
        }
        .into();
        assert_eq!(
            not_allowed.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
