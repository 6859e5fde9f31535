//! Metric name constants shared across crates.

/// Upstream fetches (counter, labels: provider, outcome).
pub const PROVIDER_FETCH_TOTAL: &str = "provider_fetch_total";
/// Context requests served (counter, labels: kind).
pub const CONTEXT_REQUESTS_TOTAL: &str = "context_requests_total";
/// Push scheduler ticks (counter, labels: outcome).
pub const PUSH_TICKS_TOTAL: &str = "push_ticks_total";
