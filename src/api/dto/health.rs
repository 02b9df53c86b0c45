//! Health check DTOs.

use serde::{Deserialize, Serialize};

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    /// Time of the check, RFC 3339
    pub timestamp: String,
    /// Number of registered destinations
    pub destinations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Accepting webhooks for at least one destination
    Healthy,
    /// Running, but no destination is configured
    Degraded,
}

impl HealthStatus {
    pub fn for_destination_count(count: usize) -> Self {
        if count == 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
