//! Conversion of `AppError` into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - Validation, BadRequest → 400
    /// - Translation, Configuration, Internal → 500
    /// - Upstream → 502
    /// - ServiceUnavailable → 503
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::validation_error(field, reason),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::ServiceUnavailable { destination } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("SERVICE_UNAVAILABLE", "target URL not configured")
                    .with_details(json!({ "destination": destination })),
            ),
            AppError::Translation { destination, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("TRANSLATION_FAILED", "translation failed")
                    .with_details(json!({ "destination": destination })),
            ),
            AppError::Upstream { destination, .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new("UPSTREAM_ERROR", "upstream error")
                    .with_details(json!({ "destination": destination })),
            ),
            AppError::Configuration { key, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key })),
            ),
            AppError::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        }

        (status, Json(error_response)).into_response()
    }
}
