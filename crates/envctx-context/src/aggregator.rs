//! Holiday/weather fan-out and context assembly.
//!
//! Both fetches run concurrently and are joined before assembly. A failed
//! fetch never cancels the other one: each outcome is reported to the
//! [`FetchObserver`] and then degraded independently, holidays to an empty
//! list and weather to `None`.

use std::sync::Arc;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use envctx_core::metrics::PROVIDER_FETCH_TOTAL;
use envctx_core::{
    EnvironmentContext, FetchOutcome, Holiday, LocaleInfo, ProviderError, ResolvedLocation,
    WeatherSnapshot,
};
use envctx_providers::{HolidayProvider, WeatherProvider};
use tracing::{debug, warn};

use crate::temporal::derive_temporal;

/// Summary of one fetch, handed to the observer.
#[derive(Debug)]
pub struct FetchReport<'a> {
    /// Provider name.
    pub provider: &'static str,
    /// `complete`, `partial` or `failed`.
    pub outcome: &'static str,
    /// The failure, for `failed` outcomes.
    pub error: Option<&'a ProviderError>,
    /// Dropped pieces, for `partial` outcomes.
    pub skipped: &'a [String],
}

impl<'a> FetchReport<'a> {
    /// Summarize `outcome` for `provider`.
    pub fn of<T>(provider: &'static str, outcome: &'a FetchOutcome<T>) -> Self {
        let (error, skipped): (Option<&ProviderError>, &[String]) = match outcome {
            FetchOutcome::Complete(_) => (None, &[]),
            FetchOutcome::Partial { skipped, .. } => (None, skipped),
            FetchOutcome::Failed(err) => (Some(err), &[]),
        };
        Self {
            provider,
            outcome: outcome.label(),
            error,
            skipped,
        }
    }
}

/// Hook notified of every fetch outcome before it is degraded.
pub trait FetchObserver: Send + Sync {
    /// Called once per fetch.
    fn observe(&self, report: &FetchReport<'_>);
}

/// Default observer: logs degraded fetches and counts every outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn observe(&self, report: &FetchReport<'_>) {
        metrics::counter!(
            PROVIDER_FETCH_TOTAL,
            "provider" => report.provider,
            "outcome" => report.outcome
        )
        .increment(1);

        if let Some(err) = report.error {
            warn!(
                provider = report.provider,
                error = %err,
                kind = err.kind(),
                "provider fetch failed, degrading"
            );
        } else if !report.skipped.is_empty() {
            debug!(
                provider = report.provider,
                skipped = ?report.skipped,
                "provider returned partial data"
            );
        }
    }
}

/// Combines all facets of an [`EnvironmentContext`].
pub struct ContextAggregator {
    holidays: Arc<dyn HolidayProvider>,
    weather: Arc<dyn WeatherProvider>,
    observer: Arc<dyn FetchObserver>,
}

impl ContextAggregator {
    /// Aggregator reporting to a [`TracingObserver`].
    pub fn new(holidays: Arc<dyn HolidayProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            holidays,
            weather,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Build the context for `location` at `now`. Never fails.
    pub async fn aggregate(
        &self,
        location: ResolvedLocation,
        locale: LocaleInfo,
        now: &DateTime<Tz>,
    ) -> EnvironmentContext {
        let (holidays, weather) = tokio::join!(
            self.fetch_holidays(location.country_code.as_deref(), now.year()),
            self.fetch_weather(location.lat, location.lon),
        );

        EnvironmentContext {
            location,
            date_time: derive_temporal(now),
            holidays,
            weather,
            locale,
        }
    }

    async fn fetch_holidays(&self, country_code: Option<&str>, year: i32) -> Vec<Holiday> {
        let Some(country_code) = country_code else {
            return Vec::new();
        };
        let outcome = self.holidays.holidays(country_code, year).await;
        self.observer
            .observe(&FetchReport::of(self.holidays.name(), &outcome));
        outcome.into_value().unwrap_or_default()
    }

    async fn fetch_weather(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        let outcome = self.weather.current(lat, lon).await;
        self.observer
            .observe(&FetchReport::of(self.weather.name(), &outcome));
        outcome.into_value()
    }
}
