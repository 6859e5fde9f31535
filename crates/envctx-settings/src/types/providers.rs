//! Upstream provider and sink transport settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URLs and timeouts for outbound calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Nager.Date base URL.
    pub holiday_base_url: String,
    /// Open-Meteo base URL (including the `/v1` prefix).
    pub weather_base_url: String,
    /// Per-request timeout for provider fetches, in milliseconds.
    pub timeout_ms: u64,
    /// Per-request timeout for sink delivery, in milliseconds.
    pub sink_timeout_ms: u64,
}

impl ProviderSettings {
    /// Provider fetch timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sink delivery timeout.
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            holiday_base_url: "https://date.nager.at".to_string(),
            weather_base_url: "https://api.open-meteo.com/v1".to_string(),
            timeout_ms: 5_000,
            sink_timeout_ms: 10_000,
        }
    }
}
