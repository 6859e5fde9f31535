//! # envctx-context
//!
//! The context pipeline: every request or scheduler tick flows
//! location resolution → temporal/locale derivation → aggregation →
//! fingerprinting → envelope building.
//!
//! - [`resolve_location`] turns an optional hint into a [`ResolvedLocation`](envctx_core::ResolvedLocation)
//! - [`derive_temporal`] and [`parse_locale`] are pure facet derivations
//! - [`ContextAggregator`] fans out the holiday and weather fetches
//! - [`compute_hash`] fingerprints a context for change detection
//! - [`envelope::snapshot`] / [`envelope::delta`] wrap the result
//! - [`ContextService`] ties them together behind an injectable [`Clock`]

#![deny(unsafe_code)]

pub mod aggregator;
pub mod clock;
pub mod envelope;
pub mod hash;
pub mod locale;
pub mod location;
pub mod service;
pub mod temporal;

pub use aggregator::{ContextAggregator, FetchObserver, FetchReport, TracingObserver};
pub use clock::{Clock, FixedClock, SystemClock};
pub use hash::compute_hash;
pub use locale::parse_locale;
pub use location::resolve_location;
pub use service::ContextService;
pub use temporal::{derive_temporal, resolve_timezone};
