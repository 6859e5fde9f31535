//! Versioned envelope for snapshot and delta responses.
//!
//! The payload is a tagged variant: either the full [`EnvironmentContext`] or
//! an explicit "no change" marker that serializes as `{}`. The `hash` field
//! always carries the fingerprint of the *current* context, whichever payload
//! is attached.

use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::EnvironmentContext;

/// Envelope schema version.
pub const ENVELOPE_VERSION: &str = "1.0";

/// Short hex fingerprint of an [`EnvironmentContext`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextHash(String);

impl ContextHash {
    /// Wrap an already computed hex digest.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a client-supplied hash names this fingerprint.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for ContextHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Envelope discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeKind {
    /// Full snapshot response.
    #[serde(rename = "context-snapshot")]
    Snapshot,
    /// Delta response (payload may be empty).
    #[serde(rename = "context-delta")]
    Delta,
}

/// Envelope payload.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvelopePayload {
    /// No change since the caller's hash. Serializes as `{}`.
    Empty,
    /// The full current context.
    Full(Box<EnvironmentContext>),
}

impl EnvelopePayload {
    /// The carried context, if any.
    pub fn context(&self) -> Option<&EnvironmentContext> {
        match self {
            Self::Empty => None,
            Self::Full(ctx) => Some(ctx),
        }
    }

    /// Whether this is the empty marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Serialize for EnvelopePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
            Self::Full(ctx) => ctx.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for EnvelopePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Object(ref map) if map.is_empty() => Ok(Self::Empty),
            other => serde_json::from_value(other)
                .map(|ctx| Self::Full(Box::new(ctx)))
                .map_err(D::Error::custom),
        }
    }
}

/// Typed, versioned wrapper around an environment context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEnvelope {
    /// `"context-snapshot"` or `"context-delta"`.
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Schema version.
    pub version: String,
    /// ISO-8601 production timestamp.
    pub produced_at: String,
    /// Fingerprint of the current context.
    pub hash: ContextHash,
    /// Full context or the empty marker.
    pub data: EnvelopePayload,
}
