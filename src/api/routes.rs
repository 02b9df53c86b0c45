//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::timeout::TimeoutLayer;

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware (runs second) - logs requests with request IDs
/// 3. Timeout (innermost) - answers `408` when a request runs too long
///
/// # Routes
/// - `GET /` - Destination listing
/// - `GET /health` - Health check
/// - `POST {path}` - One relay endpoint per registered destination
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let webhooks = handlers::webhooks::webhook_routes(state.services.relay.destinations());

    Router::new()
        .merge(webhooks)
        .merge(handlers::health::health_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // So logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
