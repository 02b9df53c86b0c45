//! The relay flow: decode, dedup, translate, render, deliver.

use std::sync::Arc;

use super::deduplicator::{Admission, Deduplicator};
use super::renderer::{RenderedMessage, Translation, render};
use super::transport::{RelayResponse, RelayTransport};
use super::url_resolver::LinkOverrides;
use crate::error::{AppError, AppResult};
use crate::models::{Destination, DestinationKind, FizzyEvent};

/// Result of relaying one webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Suppressed as a repeat; nothing was sent
    Duplicate,
    /// Sent; the destination's answer is attached
    Delivered(RelayResponse),
}

/// Relays Fizzy webhooks to the configured destinations.
///
/// Cloning is cheap; all state lives behind `Arc`s.
#[derive(Clone)]
pub struct RelayService {
    destinations: Arc<[Destination]>,
    overrides: Arc<LinkOverrides>,
    dedup: Arc<Deduplicator>,
    transport: Arc<dyn RelayTransport>,
}

impl RelayService {
    pub fn new(
        destinations: Vec<Destination>,
        overrides: LinkOverrides,
        dedup: Deduplicator,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        Self {
            destinations: destinations.into(),
            overrides: Arc::new(overrides),
            dedup: Arc::new(dedup),
            transport,
        }
    }

    /// Registered destinations in configuration order.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name == name)
    }

    pub fn overrides(&self) -> &LinkOverrides {
        &self.overrides
    }

    /// Relays one raw webhook body to the named destination.
    ///
    /// # Errors
    /// - `ServiceUnavailable` when the destination is unknown or has no URL
    /// - `BadRequest` when the body is not a valid event
    /// - `Translation` when the payload cannot be serialised
    /// - `Upstream` when the destination cannot be reached
    pub async fn relay(
        &self,
        destination_name: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> AppResult<RelayOutcome> {
        let destination = self
            .destination(destination_name)
            .filter(|d| !d.url.is_empty())
            .ok_or_else(|| AppError::ServiceUnavailable {
                destination: destination_name.to_string(),
            })?;

        let event = FizzyEvent::from_slice(body).map_err(|e| {
            tracing::warn!(destination = %destination.name, error = %e, "Rejected malformed webhook");
            AppError::BadRequest {
                message: format!("invalid fizzy json: {}", e),
            }
        })?;

        if self.dedup.check(&destination.name, &event.action, &event.eventable.id)
            == Admission::Duplicate
        {
            tracing::info!(
                destination = %destination.name,
                action = %event.action,
                eventable_id = %event.eventable.id,
                "Dropping duplicate event"
            );
            return Ok(RelayOutcome::Duplicate);
        }

        let message = self.render(destination.kind, &event);
        let payload = message.to_json().map_err(|source| AppError::Translation {
            destination: destination.name.clone(),
            source,
        })?;

        tracing::debug!(
            destination = %destination.name,
            payload = %String::from_utf8_lossy(&payload),
            "Forwarding payload"
        );

        let response = self
            .transport
            .deliver(destination, query, payload)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    destination = %destination.name,
                    action = %event.action,
                    error = %e,
                    "Delivery failed"
                );
            })?;

        tracing::info!(
            destination = %destination.name,
            action = %event.action,
            eventable_id = %event.eventable.id,
            status = response.status,
            duration_ms = response.duration_ms,
            transport = self.transport.name(),
            "Relayed event"
        );

        Ok(RelayOutcome::Delivered(response))
    }

    /// Renders an event for a destination format without dedup or delivery.
    pub fn render(&self, kind: DestinationKind, event: &FizzyEvent) -> RenderedMessage {
        let translation = Translation::new(event, &self.overrides);
        render(kind, &translation)
    }

    /// Decodes and renders a raw body, for previews.
    pub fn preview(&self, kind: DestinationKind, body: &[u8]) -> AppResult<RenderedMessage> {
        let event = FizzyEvent::from_slice(body).map_err(|e| AppError::BadRequest {
            message: format!("invalid fizzy json: {}", e),
        })?;
        Ok(self.render(kind, &event))
    }
}
