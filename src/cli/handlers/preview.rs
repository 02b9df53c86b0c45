//! Preview command handler
//!
//! Renders one event with the configured link overrides and prints the
//! payload instead of sending it.

use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::models::DestinationKind;
use crate::services::{RelayService, Services};

/// Handler for the preview command
pub struct PreviewCommandHandler {
    relay: RelayService,
}

impl PreviewCommandHandler {
    /// Builds the handler with the same relay service `serve` uses.
    pub fn new(config: &Settings) -> AppResult<Self> {
        let services = Services::from_settings(config)?;
        Ok(Self {
            relay: services.relay,
        })
    }

    /// Reads the event from `file` or stdin and prints the rendered payload.
    pub fn execute(&self, kind: DestinationKind, file: Option<&Path>) -> AppResult<()> {
        let body = match file {
            Some(path) => std::fs::read(path)
                .with_context(|| format!("Failed to read event file '{}'", path.display()))?,
            None => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read event from stdin")?;
                buffer
            }
        };

        println!("{}", self.render(kind, &body)?);
        Ok(())
    }

    /// Renders a raw event body as pretty-printed JSON.
    pub fn render(&self, kind: DestinationKind, body: &[u8]) -> AppResult<String> {
        let message = self.relay.preview(kind, body)?;
        serde_json::to_string_pretty(&message).map_err(|source| AppError::Translation {
            destination: kind.to_string(),
            source,
        })
    }
}
