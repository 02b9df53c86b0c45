//! Service layer.
//!
//! Services hold the business logic and are shared with handlers through
//! the application state.

pub mod relay;

pub use relay::RelayService;

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use relay::{Deduplicator, HttpRelayTransport, LinkOverrides, RelayTransport};

/// Aggregates all services for convenient access.
///
/// Designed to be used as Axum application state; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct Services {
    pub relay: RelayService,
}

impl Services {
    /// Builds services from validated settings using the HTTP transport.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let transport = Arc::new(HttpRelayTransport::new(settings.relay.timeout()));
        Self::with_transport(settings, transport)
    }

    /// Builds services with a custom transport.
    pub fn with_transport(
        settings: &Settings,
        transport: Arc<dyn RelayTransport>,
    ) -> AppResult<Self> {
        let overrides = LinkOverrides::new(
            settings.fizzy.root_url.as_deref(),
            settings.fizzy.account_slug.as_deref(),
        )?;
        let dedup = Deduplicator::new(settings.dedup.window(), settings.dedup.sweep_threshold);

        Ok(Self {
            relay: RelayService::new(settings.destinations.build(), overrides, dedup, transport),
        })
    }
}
