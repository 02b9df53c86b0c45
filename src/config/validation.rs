//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` runs them in order and
//! stops at the first failure.

use std::collections::HashSet;

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    DedupConfig, DestinationsConfig, FileSettings, FizzyConfig, LoggerSettings, RelayConfig,
    ServerConfig, Settings,
};
use crate::logger::{LOG_LEVELS, is_valid_level};

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Paths served by the relay itself.
const RESERVED_PATHS: &[&str] = &["/", "/health"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }
        validate_format("logger.file.format", &self.format)
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Level must be a known level or a directive list of them
    /// - Formats must be one of full, compact, json
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_level(&self.level) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        validate_format("logger.console.format", &self.console.format)?;
        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

fn validate_format(field: &str, format: &str) -> Result<(), ConfigError> {
    if VALID_LOG_FORMATS.contains(&format.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::validation(
            field,
            format!(
                "Invalid log format '{}'. Valid formats are: {}",
                format,
                VALID_LOG_FORMATS.join(", ")
            ),
        ))
    }
}

impl FizzyConfig {
    /// Validate link overrides
    ///
    /// # Validation Rules
    /// - Root URL, when set, must be absolute with a host
    /// - Account slug, when set, must not contain `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = self.root_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let url = Url::parse(root).map_err(|e| {
                ConfigError::validation("fizzy.root_url", format!("Invalid URL '{}': {}", root, e))
            })?;
            if url.host_str().is_none() {
                return Err(ConfigError::validation(
                    "fizzy.root_url",
                    format!("Root URL '{}' has no host.", root),
                ));
            }
        }

        if let Some(slug) = self.account_slug.as_deref() {
            if slug.trim().trim_matches('/').contains('/') {
                return Err(ConfigError::validation(
                    "fizzy.account_slug",
                    format!("Account slug '{}' must be a single path segment.", slug),
                ));
            }
        }

        Ok(())
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms == 0 {
            return Err(ConfigError::validation(
                "dedup.window_ms",
                "Dedup window must be greater than 0 milliseconds.",
            ));
        }
        if self.sweep_threshold == 0 {
            return Err(ConfigError::validation(
                "dedup.sweep_threshold",
                "Sweep threshold must be greater than 0.",
            ));
        }
        Ok(())
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "relay.timeout_seconds",
                "Relay timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl DestinationsConfig {
    /// Validate destinations
    ///
    /// # Validation Rules
    /// - Configured URLs must be absolute http(s) URLs
    /// - Paths of configured destinations must be literal, unique and not reserved
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for (kind, destination) in self.entries() {
            let Some(url) = destination.configured_url() else {
                continue;
            };
            let field = format!("destinations.{}", kind.as_str().replace('-', "_"));

            let parsed = Url::parse(url).map_err(|e| {
                ConfigError::validation(format!("{}.url", field), format!("Invalid URL: {}", e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::validation(
                    format!("{}.url", field),
                    format!("Unsupported scheme '{}'. Use http or https.", parsed.scheme()),
                ));
            }

            let path = destination.route_path(kind);
            validate_route_path(&format!("{}.path", field), &path)?;
            if RESERVED_PATHS.contains(&path.as_str()) {
                return Err(ConfigError::validation(
                    format!("{}.path", field),
                    format!("Path '{}' is reserved.", path),
                ));
            }
            if !seen.insert(path.clone()) {
                return Err(ConfigError::validation(
                    format!("{}.path", field),
                    format!("Path '{}' is already used by another destination.", path),
                ));
            }
        }

        Ok(())
    }
}

/// Destination paths are registered as literal routes; reject anything the
/// router would read as a capture or a wildcard.
fn validate_route_path(field: &str, path: &str) -> Result<(), ConfigError> {
    if path.contains(['{', '}']) {
        return Err(ConfigError::validation(
            field,
            format!("Path '{}' must not contain braces.", path),
        ));
    }

    if let Some(segment) = path
        .split('/')
        .find(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(ConfigError::validation(
            field,
            format!(
                "Path '{}' has segment '{}'; segments must not start with ':' or '*'.",
                path, segment
            ),
        ));
    }

    Ok(())
}

impl Settings {
    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.fizzy.validate()?;
        self.dedup.validate()?;
        self.relay.validate()?;
        self.destinations.validate()?;
        Ok(())
    }
}
