//! Push scheduler settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default push interval in seconds.
pub const DEFAULT_PUSH_INTERVAL_SECS: u64 = 600;

/// Background push to a webhook sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushSettings {
    /// Whether the scheduler should run at all.
    pub enabled: bool,
    /// Sink URL; empty disables the scheduler even when `enabled` is set.
    pub webhook_url: String,
    /// Seconds to sleep between ticks.
    pub interval_secs: u64,
    /// Locale used for pushed snapshots.
    pub locale: String,
}

impl PushSettings {
    /// Whether the scheduler has everything it needs to run.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }

    /// Inter-tick sleep.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            interval_secs: DEFAULT_PUSH_INTERVAL_SECS,
            locale: "de-DE".to_string(),
        }
    }
}
