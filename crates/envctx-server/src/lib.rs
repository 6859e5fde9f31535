//! # envctx-server
//!
//! Axum HTTP surface of the environment context service.
//!
//! - `GET /health`: liveness
//! - `GET /context`, `POST /context`: snapshot envelopes
//! - `GET /context/delta`: delta envelopes relative to `sinceHash`
//! - `GET /metrics`: Prometheus text exposition
//!
//! Request parsing is lenient: malformed location input falls back to the
//! default location instead of producing a client error.

#![deny(unsafe_code)]

pub mod config;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use server::{AppState, EnvctxServer, build_router};
pub use shutdown::ShutdownCoordinator;
