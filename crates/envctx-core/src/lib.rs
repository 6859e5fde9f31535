//! # envctx-core
//!
//! Foundation types shared by every `envctx` crate:
//!
//! - **Domain types**: location hints, resolved locations, temporal context,
//!   holidays, weather, locale, the aggregated [`EnvironmentContext`] and the
//!   versioned [`ContextEnvelope`]
//! - **Errors**: [`ProviderError`] and [`SinkError`] via `thiserror`
//! - **Fetch outcomes**: [`FetchOutcome`], the complete/partial/failed result
//!   of a single upstream fetch
//! - **Logging**: `tracing` subscriber setup plus in-memory capture for tests
//! - **Metrics**: metric name constants shared across crates

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod metrics;
pub mod outcome;
pub mod types;

pub use errors::{ProviderError, SinkError};
pub use outcome::FetchOutcome;
pub use types::*;
