//! Content fingerprint of an [`EnvironmentContext`].
//!
//! The context is serialized to JSON, every object's keys are sorted
//! recursively, and the compact encoding is hashed with SHA-256. Only the
//! first [`HASH_HEX_LEN`] hex characters are kept: the fingerprint is used
//! for in-process equality checks, never for addressing or integrity.

use envctx_core::{ContextHash, EnvironmentContext};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Length of the hex fingerprint.
pub const HASH_HEX_LEN: usize = 16;

/// Fingerprint a context.
pub fn compute_hash(context: &EnvironmentContext) -> ContextHash {
    // Serializing plain structs with string keys cannot fail
    let value = serde_json::to_value(context).unwrap_or_default();
    hash_value(&value)
}

/// Fingerprint an arbitrary JSON value, independent of key order.
pub fn hash_value(value: &Value) -> ContextHash {
    let canonical = canonicalize(value).to_string();
    let digest = Sha256::digest(canonical.as_bytes());

    let mut hex = format!("{digest:x}");
    hex.truncate(HASH_HEX_LEN);
    ContextHash::new(hex)
}

/// Copy of `value` with every object's keys in ascending order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
