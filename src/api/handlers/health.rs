//! Health check endpoint for monitoring and load balancers.

use axum::{Router, extract::State, response::Json, routing::get};
use jiff::Timestamp;

use crate::api::dto::{HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Basic health check
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Reports version, time and how many destinations are registered.
///
/// # Example Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T12:00:00Z",
///   "destinations": 2
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let destinations = state.services.relay.destinations().len();

    Json(HealthResponse {
        status: HealthStatus::for_destination_count(destinations),
        version: state.application.version.clone(),
        timestamp: Timestamp::now().to_string(),
        destinations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::relay::relay_service::tests::RecordingTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_without_destinations_is_degraded() {
        let state =
            AppState::with_transport(&Settings::default(), Arc::new(RecordingTransport::default()))
                .unwrap();

        let Json(response) = health_check(State(state)).await;
        assert_eq!(response.status, HealthStatus::Degraded);
        assert_eq!(response.destinations, 0);
        assert!(response.timestamp.parse::<Timestamp>().is_ok());
    }

    #[tokio::test]
    async fn test_health_counts_destinations() {
        let mut settings = Settings::default();
        settings.destinations.gotify.url = Some("https://push.example.com/message".to_string());
        let state =
            AppState::with_transport(&settings, Arc::new(RecordingTransport::default())).unwrap();

        let Json(response) = health_check(State(state)).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.destinations, 1);
        assert_eq!(response.version, settings.application.version);
    }
}
