//! Configuration management module for fizzy-relay
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `RELAY_*` environment variables
//! 5. Legacy variables such as `PORT` and `ZULIP_WEBHOOK_URL`
//!
//! A `.env` file is read first; it only fills variables that are unset.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DedupConfig, DestinationConfig, DestinationsConfig, FizzyConfig,
    LoggerSettings, RelayConfig, ServerConfig, Settings,
};
