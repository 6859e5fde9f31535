//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`EnvctxSettings::default()`]
//! 2. If a settings file is given and exists, deep-merge it over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use envctx_core::logging::LogFormat;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::EnvctxSettings;

/// Environment variable naming the settings file.
pub const SETTINGS_PATH_ENV: &str = "ENVCTX_SETTINGS_PATH";

/// Longest accepted push interval (one week).
const MAX_PUSH_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Settings file path from [`SETTINGS_PATH_ENV`], if set.
pub fn settings_path_from_env() -> Option<PathBuf> {
    read_env_string(SETTINGS_PATH_ENV).map(PathBuf::from)
}

/// Load settings from an optional file path with env var overrides.
///
/// Without a path, only defaults and the environment apply.
pub fn load_settings(path: Option<&Path>) -> Result<EnvctxSettings> {
    match path {
        Some(path) => load_settings_from_path(path),
        None => {
            let mut settings = EnvctxSettings::default();
            apply_env_overrides(&mut settings);
            Ok(settings)
        }
    }
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<EnvctxSettings> {
    let defaults = serde_json::to_value(EnvctxSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: EnvctxSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut EnvctxSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Invalid values are ignored with a warning, leaving the file/default value
/// in place. `PUSH_WEBHOOK_URL` is trimmed and applied even when empty, so an
/// explicitly blank variable disables pushing.
pub fn apply_overrides<F>(settings: &mut EnvctxSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    // ── Push ────────────────────────────────────────────────────────
    if let Some(raw) = lookup("PUSH_ENABLED") {
        match parse_bool(&raw) {
            Some(v) => settings.push.enabled = v,
            None => {
                warn!(key = "PUSH_ENABLED", value = %raw, "unrecognized boolean env var, disabling push");
                settings.push.enabled = false;
            }
        }
    }
    if let Some(raw) = lookup("PUSH_WEBHOOK_URL") {
        settings.push.webhook_url = raw.trim().to_string();
    }
    if let Some(raw) = lookup("PUSH_INTERVAL_SECONDS") {
        match parse_u64_range(raw.trim(), 1, MAX_PUSH_INTERVAL_SECS) {
            Some(v) => settings.push.interval_secs = v,
            None => warn!(
                key = "PUSH_INTERVAL_SECONDS",
                value = %raw,
                fallback = settings.push.interval_secs,
                "invalid push interval, ignoring"
            ),
        }
    }
    if let Some(v) = string("PUSH_LOCALE") {
        settings.push.locale = v;
    }

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = string("ENVCTX_HOST") {
        settings.server.host = v;
    }
    if let Some(raw) = lookup("ENVCTX_PORT") {
        match parse_u16_range(&raw, 1, 65535) {
            Some(v) => settings.server.port = v,
            None => warn!(key = "ENVCTX_PORT", value = %raw, "invalid port env var, ignoring"),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = string("ENVCTX_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(raw) = lookup("ENVCTX_LOG_FORMAT") {
        match LogFormat::parse(&raw) {
            Some(v) => settings.logging.format = v,
            None => warn!(key = "ENVCTX_LOG_FORMAT", value = %raw, "invalid log format, ignoring"),
        }
    }

    // ── Context / providers ─────────────────────────────────────────
    if let Some(v) = string("ENVCTX_TIMEZONE") {
        settings.context.timezone = v;
    }
    if let Some(v) = string("ENVCTX_HOLIDAY_BASE_URL") {
        settings.providers.holiday_base_url = v;
    }
    if let Some(v) = string("ENVCTX_WEATHER_BASE_URL") {
        settings.providers.weather_base_url = v;
    }
    if let Some(raw) = lookup("ENVCTX_PROVIDER_TIMEOUT_MS") {
        match parse_u64_range(&raw, 100, 120_000) {
            Some(v) => settings.providers.timeout_ms = v,
            None => warn!(key = "ENVCTX_PROVIDER_TIMEOUT_MS", value = %raw, "invalid timeout, ignoring"),
        }
    }
    if let Some(raw) = lookup("ENVCTX_SINK_TIMEOUT_MS") {
        match parse_u64_range(&raw, 100, 120_000) {
            Some(v) => settings.providers.sink_timeout_ms = v,
            None => warn!(key = "ENVCTX_SINK_TIMEOUT_MS", value = %raw, "invalid timeout, ignoring"),
        }
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
