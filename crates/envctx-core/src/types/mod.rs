//! Domain types for the environment context.
//!
//! All types serialize with camelCase keys. Optional fields serialize as
//! `null` rather than being omitted, so a missing facet is always visible to
//! clients and always participates in the content hash.

pub mod context;
pub mod envelope;
pub mod holiday;
pub mod locale;
pub mod location;
pub mod temporal;
pub mod weather;

pub use context::EnvironmentContext;
pub use envelope::{ContextEnvelope, ContextHash, ENVELOPE_VERSION, EnvelopeKind, EnvelopePayload};
pub use holiday::Holiday;
pub use locale::LocaleInfo;
pub use location::{LocationHint, ResolvedLocation};
pub use temporal::{PartOfDay, TemporalContext};
pub use weather::WeatherSnapshot;
