//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::logger::init_logger;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Logger initialization and server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        let logger_config = self.config.logger.clone().into_logger_config()?;
        init_logger(logger_config).map_err(|e| AppError::Configuration {
            key: "logger".to_string(),
            source: e.into(),
        })?;

        Server::new(self.config).run().await.map_err(AppError::from)
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());

        let destinations = self.config.destinations.build();
        if destinations.is_empty() {
            println!("! No destination has a URL; every webhook route is disabled");
        }
        for destination in &destinations {
            println!(
                "✓ {} ({}) would accept POST {}",
                destination.name, destination.kind, destination.path
            );
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
