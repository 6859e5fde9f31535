//! Collaborator traits injected into the aggregator and the push scheduler.

use async_trait::async_trait;
use envctx_core::{ContextEnvelope, FetchOutcome, Holiday, SinkError, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Source tag attached to every pushed message.
pub const PUSH_SOURCE: &str = "context_provider";

/// Public holiday registry.
#[async_trait]
pub trait HolidayProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Holidays for `country_code` in `year`.
    async fn holidays(&self, country_code: &str, year: i32) -> FetchOutcome<Vec<Holiday>>;
}

/// Current-weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Current weather at the given coordinates.
    async fn current(&self, lat: f64, lon: f64) -> FetchOutcome<WeatherSnapshot>;
}

/// Body delivered to the push sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Always [`PUSH_SOURCE`].
    pub source: String,
    /// The snapshot being pushed.
    pub payload: ContextEnvelope,
}

impl PushMessage {
    /// Wrap a snapshot envelope.
    pub fn new(payload: ContextEnvelope) -> Self {
        Self {
            source: PUSH_SOURCE.to_string(),
            payload,
        }
    }
}

/// Destination for pushed snapshots.
#[async_trait]
pub trait ContextSink: Send + Sync {
    /// Deliver one message. No retries are attempted.
    async fn deliver(&self, message: &PushMessage) -> Result<(), SinkError>;
}
