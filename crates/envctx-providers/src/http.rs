//! Shared `reqwest` client construction and error mapping.

use std::time::Duration;

use envctx_core::{ProviderError, SinkError};
use tracing::warn;

/// User agent sent on every outbound request.
pub const USER_AGENT: &str = concat!("envctx/", env!("CARGO_PKG_VERSION"));

/// Build a client whose requests time out after `timeout`.
///
/// If the full configuration is rejected, a client with only the timeout
/// is built instead so the request bound always holds.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, ?timeout, "http client build failed, retrying without user agent");
            reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|err| {
                    warn!(error = %err, "http client build failed again, using defaults");
                    reqwest::Client::default()
                })
        }
    }
}

/// Classify a `reqwest` error for a provider fetch.
pub fn provider_error(provider: &'static str, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { provider }
    } else if err.is_decode() {
        ProviderError::Decode {
            provider,
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        ProviderError::Status {
            provider,
            status: status.as_u16(),
        }
    } else {
        ProviderError::Transport {
            provider,
            message: err.to_string(),
        }
    }
}

/// Classify a `reqwest` error for a sink delivery.
pub fn sink_error(err: &reqwest::Error) -> SinkError {
    if err.is_timeout() {
        SinkError::Timeout
    } else if let Some(status) = err.status() {
        SinkError::Status(status.as_u16())
    } else {
        SinkError::Transport(err.to_string())
    }
}
