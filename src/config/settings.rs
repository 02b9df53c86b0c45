//! Configuration settings structures for fizzy-relay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::models::destination::ensure_leading_slash;
use crate::models::{Destination, DestinationKind};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "fizzy-relay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/fizzy-relay.log".to_string()
}

fn default_console_format() -> String {
    "full".to_string()
}

fn default_file_format() -> String {
    "json".to_string()
}

fn default_dedup_window_ms() -> u64 {
    2000
}

fn default_sweep_threshold() -> usize {
    1024
}

fn default_relay_timeout() -> u64 {
    10
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_console_format")]
    pub format: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
            format: default_console_format(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_file_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_file_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime logger configuration.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig {
            enabled: self.console.enabled,
            colored: self.console.colored,
            format: parse_format("logger.console.format", &self.console.format)?,
        };
        let file = FileConfig {
            enabled: self.file.enabled,
            path: PathBuf::from(self.file.path),
            append: self.file.append,
            format: parse_format("logger.file.format", &self.file.format)?,
        };

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

fn parse_format(field: &str, raw: &str) -> Result<LogFormat, ConfigError> {
    raw.parse::<LogFormat>()
        .map_err(|e| ConfigError::validation(field, e.to_string()))
}

// ============================================================================
// Relay Configuration
// ============================================================================

/// Link rewriting for the public Fizzy deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FizzyConfig {
    /// Public root URL, e.g. `https://fizzy.example.com/acme`
    #[serde(default)]
    pub root_url: Option<String>,

    /// Account slug used in rebuilt links
    #[serde(default)]
    pub account_slug: Option<String>,
}

/// Duplicate suppression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Suppression window in milliseconds
    #[serde(default = "default_dedup_window_ms")]
    pub window_ms: u64,

    /// Entry count above which expired entries are swept
    #[serde(default = "default_sweep_threshold")]
    pub sweep_threshold: usize,
}

impl DedupConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            window_ms: default_dedup_window_ms(),
            sweep_threshold: default_sweep_threshold(),
        }
    }
}

/// Outbound delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Per-delivery timeout in seconds
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_relay_timeout(),
        }
    }
}

/// One destination: the inbound path and the outbound webhook URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Inbound route; the kind's default path when unset or blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Destination is disabled while this is unset or blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DestinationConfig {
    /// The URL when set to something non-blank.
    pub fn configured_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// The route path with a leading slash, falling back to `kind`'s default.
    pub fn route_path(&self, kind: DestinationKind) -> String {
        let path = self
            .path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .unwrap_or(kind.default_path());
        ensure_leading_slash(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationsConfig {
    #[serde(default)]
    pub zulip: DestinationConfig,

    #[serde(default)]
    pub google_chat: DestinationConfig,

    #[serde(default)]
    pub gotify: DestinationConfig,
}

impl DestinationsConfig {
    /// Every destination slot paired with its kind, configured or not.
    pub fn entries(&self) -> [(DestinationKind, &DestinationConfig); 3] {
        [
            (DestinationKind::Zulip, &self.zulip),
            (DestinationKind::GoogleChat, &self.google_chat),
            (DestinationKind::Gotify, &self.gotify),
        ]
    }

    /// Destinations with a URL, in a fixed order.
    pub fn build(&self) -> Vec<Destination> {
        self.entries()
            .into_iter()
            .filter_map(|(kind, config)| {
                config
                    .configured_url()
                    .map(|url| Destination::new(kind, config.route_path(kind), url))
            })
            .collect()
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub fizzy: FizzyConfig,

    #[serde(default)]
    pub dedup: DedupConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub destinations: DestinationsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
        assert_eq!(settings.dedup.window(), Duration::from_secs(2));
        assert_eq!(settings.relay.timeout(), Duration::from_secs(10));
        let destinations = &settings.destinations;
        assert_eq!(destinations.zulip.route_path(DestinationKind::Zulip), "/zulip");
        assert_eq!(
            destinations.google_chat.route_path(DestinationKind::GoogleChat),
            "/google-chat"
        );
        assert_eq!(destinations.gotify.route_path(DestinationKind::Gotify), "/gotify");
        assert!(destinations.build().is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 9000

            [destinations.gotify]
            url = "https://push.example.com/message?token=abc"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.dedup.sweep_threshold, 1024);

        let built = settings.destinations.build();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].path, "/gotify");
    }

    #[test]
    fn test_destination_table_without_path_uses_kind_default() {
        let settings: Settings = toml::from_str(
            r#"
            [destinations.zulip]
            url = "https://zulip.example.com/hook"

            [destinations.google_chat]
            path = "  "
            url = "https://chat.googleapis.com/v1/spaces/x"
            "#,
        )
        .unwrap();

        let built = settings.destinations.build();
        assert_eq!(built[0].path, "/zulip");
        assert_eq!(built[1].path, "/google-chat");
    }

    #[test]
    fn test_build_skips_blank_urls_and_normalises_paths() {
        let mut destinations = DestinationsConfig::default();
        destinations.zulip.url = Some("   ".to_string());
        destinations.google_chat.url = Some("https://chat.googleapis.com/v1/spaces/x".to_string());
        destinations.google_chat.path = Some("gchat".to_string());
        destinations.gotify.url = Some("https://push.example.com/message".to_string());

        let built = destinations.build();
        assert_eq!(built.len(), 2);
        assert_eq!(built[0].kind, DestinationKind::GoogleChat);
        assert_eq!(built[0].path, "/gchat");
        assert_eq!(built[1].name, "gotify");
    }

    #[test]
    fn test_logger_settings_conversion() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            console: ConsoleSettings {
                format: "compact".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.console.format, LogFormat::Compact);
        assert_eq!(config.file.format, LogFormat::Json);
    }

    #[test]
    fn test_logger_settings_reject_bad_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.into_logger_config().unwrap_err();
        assert_eq!(err.key(), "logger.file.format");
    }

    fn arb_destination() -> impl Strategy<Value = DestinationConfig> {
        (
            prop::option::of("/[a-z]{1,12}"),
            prop::option::of("https://[a-z]{1,10}\\.example\\.com/[a-z]{0,8}"),
        )
            .prop_map(|(path, url)| DestinationConfig { path, url })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            1u16..=65535,
            1u64..3600,
            100u64..60_000,
            arb_destination(),
            arb_destination(),
            arb_destination(),
        )
            .prop_map(|(port, timeout, window_ms, zulip, google_chat, gotify)| Settings {
                server: ServerConfig {
                    port,
                    request_timeout: timeout,
                    ..Default::default()
                },
                dedup: DedupConfig {
                    window_ms,
                    ..Default::default()
                },
                destinations: DestinationsConfig {
                    zulip,
                    google_chat,
                    gotify,
                },
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn prop_settings_toml_round_trip(settings in arb_settings()) {
            let encoded = toml::to_string(&settings).unwrap();
            let decoded: Settings = toml::from_str(&encoded).unwrap();
            prop_assert_eq!(decoded, settings);
        }
    }
}
