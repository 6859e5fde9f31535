//! Date/time facet derivation.

use chrono::{DateTime, SecondsFormat, Timelike};
use chrono_tz::Tz;
use envctx_core::{PartOfDay, TemporalContext};
use tracing::warn;

/// Service timezone used when none (or an unknown one) is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Parse an IANA timezone name, falling back to [`DEFAULT_TIMEZONE`].
pub fn resolve_timezone(name: &str) -> Tz {
    match name.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = name, fallback = DEFAULT_TIMEZONE.name(), "unknown timezone");
            DEFAULT_TIMEZONE
        }
    }
}

/// ISO-8601 with offset at second precision, e.g. `2025-03-03T09:00:00+01:00`.
pub fn format_iso(instant: &DateTime<Tz>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Derive the temporal facet for `now`.
pub fn derive_temporal(now: &DateTime<Tz>) -> TemporalContext {
    TemporalContext {
        iso: format_iso(now),
        timezone: now.timezone().name().to_string(),
        weekday: now.format("%A").to_string(),
        part_of_day: PartOfDay::from_hour(now.hour()),
    }
}
