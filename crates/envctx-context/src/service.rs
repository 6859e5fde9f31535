//! Request-path facade over the context pipeline.

use std::sync::Arc;

use chrono_tz::Tz;
use envctx_core::{ContextEnvelope, LocationHint};

use crate::aggregator::ContextAggregator;
use crate::clock::Clock;
use crate::envelope;
use crate::locale::parse_locale;
use crate::location::resolve_location;
use crate::temporal::format_iso;

/// Builds snapshot and delta envelopes.
///
/// Holds no mutable state: concurrent callers share one instance.
pub struct ContextService {
    aggregator: ContextAggregator,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl ContextService {
    /// Create a service reading time from `clock` in `timezone`.
    pub fn new(aggregator: ContextAggregator, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            aggregator,
            clock,
            timezone,
        }
    }

    /// Service timezone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Build a `context-snapshot` envelope.
    pub async fn build_snapshot(
        &self,
        accept_language: Option<&str>,
        hint: Option<&LocationHint>,
    ) -> ContextEnvelope {
        let now = self.clock.now().with_timezone(&self.timezone);
        let location = resolve_location(hint);
        let locale = parse_locale(accept_language);

        let context = self.aggregator.aggregate(location, locale, &now).await;
        envelope::snapshot(context, format_iso(&now))
    }

    /// Build a `context-delta` envelope relative to `since_hash`.
    pub async fn build_delta(
        &self,
        accept_language: Option<&str>,
        hint: Option<&LocationHint>,
        since_hash: Option<&str>,
    ) -> ContextEnvelope {
        let snapshot = self.build_snapshot(accept_language, hint).await;
        envelope::delta(snapshot, since_hash)
    }
}
