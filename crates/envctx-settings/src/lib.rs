//! # envctx-settings
//!
//! Configuration for the environment context service, loaded in three
//! layers (in priority order):
//! 1. **Compiled defaults**: [`EnvctxSettings::default()`]
//! 2. **Settings file**: optional JSON file, deep-merged over defaults
//! 3. **Environment variables**: `PUSH_*` and `ENVCTX_*` overrides
//!
//! Invalid environment values never fail startup; they are ignored with a
//! warning and the lower layer's value stays in effect.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, deep_merge, load_settings, load_settings_from_path};
pub use types::*;
