//! # envctx-push
//!
//! Background task that periodically builds a snapshot for the default
//! location and forwards it to a sink only when its hash changed since the
//! last successful push.

#![deny(unsafe_code)]

pub mod scheduler;

pub use scheduler::{PushScheduler, TickOutcome};
