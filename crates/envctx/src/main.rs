//! # envctx
//!
//! Environment context service binary: loads settings, wires providers into
//! the context pipeline, serves HTTP and runs the optional push scheduler
//! until Ctrl-C.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use envctx_context::{ContextAggregator, ContextService, SystemClock, resolve_timezone};
use envctx_core::logging::init_subscriber;
use envctx_providers::{NagerHolidayProvider, OpenMeteoWeatherProvider};
use envctx_push::PushScheduler;
use envctx_server::{EnvctxServer, ServerConfig, ShutdownCoordinator};
use envctx_settings::EnvctxSettings;
use envctx_settings::loader::settings_path_from_env;

/// Environment context service.
#[derive(Parser, Debug)]
#[command(name = "envctx", version, about = "Environment context service")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a JSON settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `envctx_context=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Apply CLI overrides on top of loaded settings.
    fn apply(&self, settings: &mut EnvctxSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

/// Wire the real providers into a [`ContextService`].
fn build_service(settings: &EnvctxSettings) -> Arc<ContextService> {
    let providers = &settings.providers;
    let aggregator = ContextAggregator::new(
        Arc::new(NagerHolidayProvider::new(
            providers.holiday_base_url.clone(),
            providers.timeout(),
        )),
        Arc::new(OpenMeteoWeatherProvider::new(
            providers.weather_base_url.clone(),
            providers.timeout(),
        )),
    );
    let timezone = resolve_timezone(&settings.context.timezone);
    Arc::new(ContextService::new(aggregator, Arc::new(SystemClock), timezone))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(settings_path_from_env);
    let mut settings = envctx_settings::load_settings(settings_path.as_deref())
        .context("failed to load settings")?;
    cli.apply(&mut settings);

    init_subscriber(&settings.logging.level, settings.logging.format);
    tracing::debug!(?settings, "settings loaded");

    let metrics = match envctx_server::metrics::install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(error = %err, "metrics recorder unavailable");
            None
        }
    };

    let service = build_service(&settings);
    let config = ServerConfig::from_settings(&settings.server);
    let shutdown_timeout = config.shutdown_timeout;

    let mut server = EnvctxServer::new(config, service.clone());
    if let Some(handle) = metrics {
        server = server.with_metrics(handle);
    }
    let bind_addr = server.config().bind_addr();
    let listener = server
        .bind()
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    let mut coordinator = ShutdownCoordinator::new();

    let token = coordinator.token();
    coordinator.spawn("http", async move {
        if let Err(err) = server.serve(listener, token).await {
            tracing::error!(error = %err, "http server failed");
        }
    });

    if let Some(scheduler) = PushScheduler::from_settings(
        &settings.push,
        service,
        settings.providers.sink_timeout(),
    ) {
        let token = coordinator.token();
        coordinator.spawn("push", scheduler.run(token));
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    coordinator.shutdown(shutdown_timeout).await;
    tracing::info!("shutdown complete");
    Ok(())
}
