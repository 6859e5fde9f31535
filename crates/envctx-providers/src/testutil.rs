//! In-memory collaborators for tests in downstream crates.
//!
//! Every fake counts its calls so tests can assert on fan-out and dedup
//! behavior without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use envctx_core::{FetchOutcome, Holiday, ProviderError, SinkError, WeatherSnapshot};

use crate::traits::{ContextSink, HolidayProvider, PushMessage, WeatherProvider};

/// Holiday provider that always returns the same list.
pub struct StaticHolidays {
    holidays: Vec<Holiday>,
    calls: Mutex<Vec<(String, i32)>>,
}

impl StaticHolidays {
    /// Return `holidays` on every call.
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self {
            holidays,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(country_code, year)` of every call so far.
    pub fn calls(&self) -> Vec<(String, i32)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HolidayProvider for StaticHolidays {
    fn name(&self) -> &'static str {
        "static-holidays"
    }

    async fn holidays(&self, country_code: &str, year: i32) -> FetchOutcome<Vec<Holiday>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((country_code.to_string(), year));
        FetchOutcome::Complete(self.holidays.clone())
    }
}

/// Holiday provider that always fails with a 503.
#[derive(Default)]
pub struct FailingHolidays {
    calls: AtomicUsize,
}

impl FailingHolidays {
    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HolidayProvider for FailingHolidays {
    fn name(&self) -> &'static str {
        "failing-holidays"
    }

    async fn holidays(&self, _country_code: &str, _year: i32) -> FetchOutcome<Vec<Holiday>> {
        let _ = self.calls.fetch_add(1, Ordering::Relaxed);
        FetchOutcome::Failed(ProviderError::Status {
            provider: "failing-holidays",
            status: 503,
        })
    }
}

/// Weather provider that returns snapshots from a script.
///
/// The last entry repeats once the script is exhausted.
pub struct StaticWeather {
    script: Vec<WeatherSnapshot>,
    calls: AtomicUsize,
}

impl StaticWeather {
    /// Return `snapshot` on every call.
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        Self::scripted(vec![snapshot])
    }

    /// Return each snapshot in turn, then keep returning the last one.
    pub fn scripted(script: Vec<WeatherSnapshot>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WeatherProvider for StaticWeather {
    fn name(&self) -> &'static str {
        "static-weather"
    }

    async fn current(&self, _lat: f64, _lon: f64) -> FetchOutcome<WeatherSnapshot> {
        let index = self.calls.fetch_add(1, Ordering::Relaxed);
        let snapshot = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .cloned();
        match snapshot {
            Some(snapshot) => FetchOutcome::Complete(snapshot),
            None => FetchOutcome::Failed(ProviderError::Decode {
                provider: "static-weather",
                message: "empty script".to_string(),
            }),
        }
    }
}

/// Weather provider that always times out.
#[derive(Default)]
pub struct FailingWeather {
    calls: AtomicUsize,
}

impl FailingWeather {
    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WeatherProvider for FailingWeather {
    fn name(&self) -> &'static str {
        "failing-weather"
    }

    async fn current(&self, _lat: f64, _lon: f64) -> FetchOutcome<WeatherSnapshot> {
        let _ = self.calls.fetch_add(1, Ordering::Relaxed);
        FetchOutcome::Failed(ProviderError::Timeout {
            provider: "failing-weather",
        })
    }
}

/// Sink that records every delivery, optionally failing each one.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<PushMessage>>,
    attempts: AtomicUsize,
    failing: bool,
}

impl RecordingSink {
    /// A sink that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every message with HTTP 500.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far.
    pub fn deliveries(&self) -> Vec<PushMessage> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delivery attempts so far, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContextSink for RecordingSink {
    async fn deliver(&self, message: &PushMessage) -> Result<(), SinkError> {
        let _ = self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.failing {
            return Err(SinkError::Status(500));
        }
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}
