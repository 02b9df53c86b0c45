//! Outbound delivery targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering format a destination expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationKind {
    /// Team chat accepting a single markdown `text` field
    Zulip,
    /// Chat bot rendering structured cards with widgets
    GoogleChat,
    /// Mobile push gateway
    Gotify,
}

impl DestinationKind {
    pub const ALL: [DestinationKind; 3] = [
        DestinationKind::Zulip,
        DestinationKind::GoogleChat,
        DestinationKind::Gotify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Zulip => "zulip",
            DestinationKind::GoogleChat => "google-chat",
            DestinationKind::Gotify => "gotify",
        }
    }

    /// Route path used when the configuration does not name one.
    pub fn default_path(&self) -> &'static str {
        match self {
            DestinationKind::Zulip => "/zulip",
            DestinationKind::GoogleChat => "/google-chat",
            DestinationKind::Gotify => "/gotify",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "zulip" => Ok(DestinationKind::Zulip),
            "google-chat" | "googlechat" => Ok(DestinationKind::GoogleChat),
            "gotify" => Ok(DestinationKind::Gotify),
            _ => Err(format!(
                "Unknown destination kind '{}'. Valid kinds are: zulip, google-chat, gotify",
                s
            )),
        }
    }
}

/// A configured delivery target, immutable once built at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    /// Stable name, part of the dedup key
    pub name: String,
    /// Inbound route path, always starting with `/`
    pub path: String,
    /// Outbound webhook URL
    pub url: String,
    pub kind: DestinationKind,
}

impl Destination {
    pub fn new(kind: DestinationKind, path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: kind.as_str().to_string(),
            path: ensure_leading_slash(&path.into()),
            url: url.into(),
            kind,
        }
    }
}

/// Prefixes `/` unless already present.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
