//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::DestinationKind;

/// Relays Fizzy webhooks to Zulip, Google Chat and Gotify
#[derive(Parser, Debug)]
#[command(name = "fizzy-relay")]
#[command(about = "Relays Fizzy webhooks to Zulip, Google Chat and Gotify")]
#[command(long_about = "
fizzy-relay receives webhook events from Fizzy, turns each one into a short
message with a deep link back to the card, and forwards it to the configured
chat and push destinations. Repeats of the same event within a short window
are dropped.

EXAMPLES:
    # Start the relay with default configuration
    fizzy-relay serve

    # Start on a custom host and port
    fizzy-relay serve --host 127.0.0.1 --port 9000

    # Use a single configuration file
    fizzy-relay --config /etc/fizzy-relay/relay.toml serve

    # Check configuration without starting the server
    fizzy-relay serve --dry-run

    # Show what Zulip would receive for a saved event
    fizzy-relay preview --format zulip --file event.json

    # Same, reading the event from stdin
    cat event.json | fizzy-relay preview --format google-chat
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// Environment variables still override its values.
    ///
    /// Example: --config /etc/fizzy-relay/relay.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` layer is loaded,
    /// instead of reading RELAY_APP_ENV.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug, which includes every forwarded payload.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay server (default)
    ///
    /// Registers one POST route per configured destination and begins
    /// accepting webhooks.
    ///
    /// Examples:
    ///   fizzy-relay serve                             # Start with defaults
    ///   fizzy-relay serve --host 127.0.0.1 --port 80  # Bind to localhost on port 80
    ///   fizzy-relay serve --dry-run                   # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Must be between 1 and 65535.
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Returns exit code 0 if valid, non-zero if invalid.
        #[arg(long)]
        dry_run: bool,
    },
    /// Render an event without sending it
    ///
    /// Reads one Fizzy event as JSON and prints the payload the chosen
    /// destination format would receive. Link overrides from the
    /// configuration are applied; nothing is deduplicated or delivered.
    ///
    /// Examples:
    ///   fizzy-relay preview --format gotify --file event.json
    ///   fizzy-relay preview --format zulip < event.json
    Preview {
        /// Destination format to render
        #[arg(short, long, value_enum)]
        format: Format,

        /// Event file; stdin when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Destination formats accepted by `preview`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    #[value(name = "zulip")]
    Zulip,
    #[value(name = "google-chat", alias = "gchat")]
    GoogleChat,
    #[value(name = "gotify")]
    Gotify,
}

impl Cli {
    /// Validate argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Preview {
            file: Some(path), ..
        }) = &self.command
            && !path.is_file()
        {
            return Err(format!("Event file does not exist: '{}'", path.display()));
        }

        Ok(())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl From<Format> for DestinationKind {
    fn from(format: Format) -> Self {
        match format {
            Format::Zulip => DestinationKind::Zulip,
            Format::GoogleChat => DestinationKind::GoogleChat,
            Format::Gotify => DestinationKind::Gotify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["fizzy-relay", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["fizzy-relay", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["fizzy-relay"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "fizzy-relay",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run,
        }) = cli.command
        else {
            panic!("Expected Serve command");
        };
        assert_eq!(host, Some("127.0.0.1".to_string()));
        assert_eq!(port, Some(9000));
        assert!(matches!(log_level, Some(LogLevel::Debug)));
        assert!(!dry_run);
    }

    #[test]
    fn test_preview_command() {
        let cli =
            Cli::try_parse_from(["fizzy-relay", "preview", "--format", "google-chat"]).unwrap();

        let Some(Commands::Preview { format, file }) = cli.command else {
            panic!("Expected Preview command");
        };
        assert_eq!(format, Format::GoogleChat);
        assert_eq!(DestinationKind::from(format), DestinationKind::GoogleChat);
        assert!(file.is_none());
    }

    #[test]
    fn test_preview_requires_format() {
        let err = Cli::try_parse_from(["fizzy-relay", "preview"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err =
            Cli::try_parse_from(["fizzy-relay", "preview", "--format", "slack"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["fizzy-relay", "--env", "prod"]).unwrap();
        assert!(matches!(cli.env, Some(Environment::Production)));
        assert_eq!(
            crate::config::Environment::from(Environment::Staging),
            crate::config::Environment::Staging
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["fizzy-relay", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_validate_missing_event_file() {
        let cli = Cli::try_parse_from([
            "fizzy-relay",
            "preview",
            "--format",
            "zulip",
            "--file",
            "/definitely/not/here.json",
        ])
        .unwrap();
        assert!(cli.validate().is_err());
    }
}
