//! # envctx-providers
//!
//! External collaborators of the context pipeline, each behind a trait so
//! the pipeline can be exercised without a network:
//!
//! - [`HolidayProvider`]: Nager.Date public holidays ([`NagerHolidayProvider`])
//! - [`WeatherProvider`]: Open-Meteo current weather ([`OpenMeteoWeatherProvider`])
//! - [`ContextSink`]: JSON webhook for pushed snapshots ([`WebhookSink`])
//!
//! Providers never return `Err`: every transport, status and decode failure
//! comes back as [`FetchOutcome::Failed`](envctx_core::FetchOutcome::Failed).

#![deny(unsafe_code)]

pub mod http;
pub mod nager;
pub mod open_meteo;
pub mod testutil;
pub mod traits;
pub mod webhook;

pub use nager::NagerHolidayProvider;
pub use open_meteo::OpenMeteoWeatherProvider;
pub use traits::{ContextSink, HolidayProvider, PushMessage, WeatherProvider};
pub use webhook::WebhookSink;
