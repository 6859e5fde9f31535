//! Error types for upstream providers and the push sink.
//!
//! Neither error type ever reaches an HTTP client: provider errors are
//! converted to [`FetchOutcome::Failed`](crate::FetchOutcome::Failed) at the
//! aggregator boundary, and sink errors end at the scheduler tick boundary.

use thiserror::Error;

/// A failed fetch from an upstream data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, DNS or TLS failure.
    #[error("{provider} request failed: {message}")]
    Transport {
        /// Provider name.
        provider: &'static str,
        /// Transport error description.
        message: String,
    },
    /// The request did not finish within the configured timeout.
    #[error("{provider} request timed out")]
    Timeout {
        /// Provider name.
        provider: &'static str,
    },
    /// Non-2xx response.
    #[error("{provider} returned HTTP {status}")]
    Status {
        /// Provider name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The body was not the expected JSON shape.
    #[error("{provider} returned an undecodable payload: {message}")]
    Decode {
        /// Provider name.
        provider: &'static str,
        /// Decoder error description.
        message: String,
    },
}

impl ProviderError {
    /// Name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Timeout { provider }
            | Self::Status { provider, .. }
            | Self::Decode { provider, .. } => provider,
        }
    }

    /// Short machine-readable kind, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
        }
    }
}

/// A failed delivery to the push sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection, DNS or TLS failure.
    #[error("sink delivery failed: {0}")]
    Transport(String),
    /// The delivery did not finish within the configured timeout.
    #[error("sink delivery timed out")]
    Timeout,
    /// Non-2xx response from the sink.
    #[error("sink returned HTTP {0}")]
    Status(u16),
    /// The payload could not be serialized.
    #[error("failed to encode push payload: {0}")]
    Encode(#[from] serde_json::Error),
}
