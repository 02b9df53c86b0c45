//! CLI module for fizzy-relay
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command handlers for serve and preview

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, Format, LogLevel};

use std::path::Path;

use crate::config::loader::{DOTENV_FILE, load_dotenv};
use crate::config::settings::Settings;

/// Load and merge configuration from CLI arguments
///
/// 1. Read `.env` into the environment without replacing set variables
/// 2. Load base configuration from files and environment variables
/// 3. Merge CLI argument overrides
/// 4. Validate the final configuration
///
/// # Errors
/// Returns error if `.env` is unreadable or configuration loading, merging,
/// or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    load_dotenv(Path::new(DOTENV_FILE))?;

    let merger = ConfigurationMerger::load(cli.config.as_deref(), cli.env.map(Into::into))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    merger
        .merge_cli_args(cli)
        .map_err(|e| anyhow::anyhow!("Configuration merge error: {}", e))
}
