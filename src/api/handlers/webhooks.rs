//! Inbound webhook endpoints, one per configured destination.

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::error::AppResult;
use crate::models::Destination;
use crate::services::relay::{RelayOutcome, RelayResponse};
use crate::state::AppState;

/// Creates the webhook routes.
///
/// # Routes
/// - `GET /` - Plain-text listing of registered destinations
/// - `POST {path}` - Relay to the destination registered at `path`
pub fn webhook_routes(destinations: &[Destination]) -> Router<AppState> {
    destinations.iter().fold(
        Router::new().route("/", get(list_destinations)),
        |router, destination| {
            let name = destination.name.clone();
            router.route(
                &destination.path,
                post(
                    move |state: State<AppState>, query: RawQuery, body: Bytes| {
                        let name = name.clone();
                        async move { relay_webhook(state, &name, query, body).await }
                    },
                ),
            )
        },
    )
}

/// Relays one webhook and answers with what the destination answered.
///
/// A duplicate gets `200 OK` with an empty body.
pub async fn relay_webhook(
    State(state): State<AppState>,
    destination: &str,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> AppResult<Response> {
    let outcome = state
        .services
        .relay
        .relay(destination, query.as_deref(), &body)
        .await?;

    Ok(match outcome {
        RelayOutcome::Duplicate => StatusCode::OK.into_response(),
        RelayOutcome::Delivered(response) => passthrough(response),
    })
}

/// Connection-level headers that describe the upstream hop, not the body.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "content-length"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

fn passthrough(upstream: RelayResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, Body::from(upstream.body)).into_response();

    let headers = response.headers_mut();
    for (name, value) in upstream.headers.iter() {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    response
}

/// `GET /`
pub async fn list_destinations(State(state): State<AppState>) -> String {
    render_listing(state.services.relay.destinations())
}

fn render_listing(destinations: &[Destination]) -> String {
    if destinations.is_empty() {
        return "fizzy-relay: no destinations configured\n".to_string();
    }

    let mut listing = String::from("fizzy-relay destinations:\n");
    for destination in destinations {
        listing.push_str(&format!(
            "  {} ({}) POST {}\n",
            destination.name, destination.kind, destination.path
        ));
    }
    listing
}
