//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::{ApplicationConfig, Settings};
use crate::error::AppResult;
use crate::services::Services;
use crate::services::relay::RelayTransport;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since services keep their state behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Name and version reported by the health endpoint
    pub application: ApplicationConfig,
}

impl AppState {
    /// Creates the state from validated settings, delivering over HTTP.
    pub fn new(settings: &Settings) -> AppResult<Self> {
        Ok(Self {
            services: Services::from_settings(settings)?,
            application: settings.application.clone(),
        })
    }

    /// Creates the state with a custom relay transport.
    pub fn with_transport(
        settings: &Settings,
        transport: Arc<dyn RelayTransport>,
    ) -> AppResult<Self> {
        Ok(Self {
            services: Services::with_transport(settings, transport)?,
            application: settings.application.clone(),
        })
    }
}
