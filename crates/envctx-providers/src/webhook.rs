//! JSON webhook sink for pushed snapshots.

use std::time::Duration;

use async_trait::async_trait;
use envctx_core::SinkError;
use tracing::debug;

use crate::http::{build_client, sink_error};
use crate::traits::{ContextSink, PushMessage};

/// POSTs each [`PushMessage`] as JSON to a fixed URL.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink for `url` with a per-delivery timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url: url.into(),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContextSink for WebhookSink {
    async fn deliver(&self, message: &PushMessage) -> Result<(), SinkError> {
        let body = serde_json::to_vec(message)?;
        debug!(url = %self.url, bytes = body.len(), "delivering push message");

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| sink_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SinkError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use envctx_core::{
        ContextEnvelope, ContextHash, ENVELOPE_VERSION, EnvelopeKind, EnvelopePayload,
    };
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn message() -> PushMessage {
        PushMessage::new(ContextEnvelope {
            kind: EnvelopeKind::Snapshot,
            version: ENVELOPE_VERSION.to_string(),
            produced_at: "2025-03-03T09:00:00Z".to_string(),
            hash: ContextHash::new("0123456789abcdef"),
            data: EnvelopePayload::Empty,
        })
    }

    #[tokio::test]
    async fn posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "source": "context_provider",
                "payload": {"type": "context-snapshot", "hash": "0123456789abcdef"}
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let sink = WebhookSink::new(format!("{}/hook", server.uri()), Duration::from_secs(2));
        sink.deliver(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = WebhookSink::new(server.uri(), Duration::from_secs(2));
        let err = sink.deliver(&message()).await.unwrap_err();
        assert_matches!(err, SinkError::Status(500));
    }

    #[tokio::test]
    async fn slow_sink_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let sink = WebhookSink::new(server.uri(), Duration::from_millis(50));
        let err = sink.deliver(&message()).await.unwrap_err();
        assert_matches!(err, SinkError::Timeout);
    }
}
