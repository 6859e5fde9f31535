//! Deduplicating push loop.
//!
//! The scheduler is either idle (never constructed, see
//! [`PushScheduler::from_settings`]) or running. While running it owns the
//! last pushed hash exclusively; the request path never sees it.

use std::sync::Arc;
use std::time::Duration;

use envctx_context::ContextService;
use envctx_core::ContextHash;
use envctx_core::metrics::PUSH_TICKS_TOTAL;
use envctx_providers::{ContextSink, PushMessage, WebhookSink};
use envctx_settings::{DEFAULT_PUSH_INTERVAL_SECS, PushSettings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of one scheduler tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snapshot changed and the sink accepted it.
    Pushed(ContextHash),
    /// The snapshot hash equals the last pushed one.
    Unchanged,
    /// The sink rejected the snapshot; the stored hash is untouched.
    Failed,
}

impl TickOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pushed(_) => "pushed",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
        }
    }
}

/// Periodically pushes changed snapshots to a sink.
pub struct PushScheduler {
    service: Arc<ContextService>,
    sink: Arc<dyn ContextSink>,
    interval: Duration,
    locale: String,
    last_hash: Option<ContextHash>,
}

impl PushScheduler {
    /// Create a running scheduler.
    pub fn new(
        service: Arc<ContextService>,
        sink: Arc<dyn ContextSink>,
        interval: Duration,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            service,
            sink,
            interval,
            locale: locale.into(),
            last_hash: None,
        }
    }

    /// Build a webhook-backed scheduler, or `None` when push is disabled or
    /// has no target.
    pub fn from_settings(
        settings: &PushSettings,
        service: Arc<ContextService>,
        sink_timeout: Duration,
    ) -> Option<Self> {
        if !settings.is_active() {
            info!(
                enabled = settings.enabled,
                has_url = !settings.webhook_url.trim().is_empty(),
                "push scheduler idle"
            );
            return None;
        }

        let interval = if settings.interval_secs == 0 {
            warn!(fallback = DEFAULT_PUSH_INTERVAL_SECS, "push interval of 0s, using default");
            Duration::from_secs(DEFAULT_PUSH_INTERVAL_SECS)
        } else {
            settings.interval()
        };

        let sink = WebhookSink::new(settings.webhook_url.trim(), sink_timeout);
        info!(url = %sink.url(), interval_secs = interval.as_secs(), "push scheduler configured");
        Some(Self::new(service, Arc::new(sink), interval, settings.locale.clone()))
    }

    /// Inter-tick sleep.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Hash of the last successful push.
    pub fn last_hash(&self) -> Option<&ContextHash> {
        self.last_hash.as_ref()
    }

    /// Build one snapshot and push it if it changed.
    pub async fn tick(&mut self) -> TickOutcome {
        let envelope = self.service.build_snapshot(Some(&self.locale), None).await;

        let outcome = if self.last_hash.as_ref() == Some(&envelope.hash) {
            debug!(hash = %envelope.hash, "snapshot unchanged, skipping push");
            TickOutcome::Unchanged
        } else {
            let hash = envelope.hash.clone();
            match self.sink.deliver(&PushMessage::new(envelope)).await {
                Ok(()) => {
                    info!(%hash, "pushed context snapshot");
                    self.last_hash = Some(hash.clone());
                    TickOutcome::Pushed(hash)
                }
                Err(err) => {
                    warn!(%hash, error = %err, "push delivery failed");
                    TickOutcome::Failed
                }
            }
        };

        metrics::counter!(PUSH_TICKS_TOTAL, "outcome" => outcome.label()).increment(1);
        outcome
    }

    /// Tick, then sleep, until `cancel` fires during a sleep.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), locale = %self.locale, "push scheduler started");
        loop {
            let _ = self.tick().await;
            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = cancel.cancelled() => break,
            }
        }
        info!("push scheduler stopped");
    }
}
