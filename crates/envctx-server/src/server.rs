//! `EnvctxServer`: Axum router and listener.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use envctx_context::ContextService;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::handlers;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot/delta builder.
    pub service: Arc<ContextService>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/context", get(handlers::get_context).post(handlers::post_context))
        .route("/context/delta", get(handlers::get_delta))
        .route("/metrics", get(handlers::render_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The HTTP server.
pub struct EnvctxServer {
    config: ServerConfig,
    state: AppState,
}

impl EnvctxServer {
    /// Create a server around `service`.
    pub fn new(config: ServerConfig, service: Arc<ContextService>) -> Self {
        Self {
            config,
            state: AppState {
                service,
                metrics: None,
            },
        }
    }

    /// Expose `/metrics` from `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state.metrics = Some(handle);
        self
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The router for this server's state.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr()).await
    }

    /// Serve on `listener` until `cancel` fires, then drain open requests.
    pub async fn serve(self, listener: TcpListener, cancel: CancellationToken) -> io::Result<()> {
        let local_addr: SocketAddr = listener.local_addr()?;
        info!(%local_addr, "envctx server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await?;

        info!("envctx server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{TimeZone, Utc};
    use envctx_context::temporal::DEFAULT_TIMEZONE;
    use envctx_context::{ContextAggregator, FixedClock};
    use envctx_core::WeatherSnapshot;
    use envctx_providers::testutil::{FailingHolidays, FailingWeather, StaticHolidays, StaticWeather};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn service(aggregator: ContextAggregator) -> Arc<ContextService> {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap(),
        ));
        Arc::new(ContextService::new(aggregator, clock, DEFAULT_TIMEZONE))
    }

    fn make_server() -> EnvctxServer {
        let aggregator = ContextAggregator::new(
            Arc::new(StaticHolidays::new(vec![])),
            Arc::new(StaticWeather::new(WeatherSnapshot::empty("open-meteo"))),
        );
        EnvctxServer::new(ServerConfig::default(), service(aggregator))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(resp.into_body(), 100_000)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok_true() {
        let resp = make_server().router().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn get_context_with_query_location() {
        let req = Request::builder()
            .uri("/context?lat=52.5&lon=13.4&city=Berlin&countryCode=DE&region=DE-BE")
            .header(header::ACCEPT_LANGUAGE, "fr-FR,fr;q=0.9")
            .body(Body::empty())
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["type"], "context-snapshot");
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["data"]["location"]["city"], "Berlin");
        assert_eq!(json["data"]["location"]["region"], "DE-BE");
        assert_eq!(json["data"]["location"]["lat"], 52.5);
        assert_eq!(json["data"]["locale"]["language"], "fr");
        assert_eq!(json["data"]["dateTime"]["partOfDay"], "morning");
        assert_eq!(json["hash"].as_str().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn malformed_query_falls_back_to_default() {
        let resp = make_server()
            .router()
            .oneshot(get("/context?lat=abc&lon=13.4"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["location"]["lat"], 49.0069);
        assert_eq!(json["data"]["location"]["city"], "Karlsruhe");
        assert_eq!(json["data"]["locale"]["locale"], "en-US");
    }

    #[tokio::test]
    async fn repeated_query_keys_are_not_rejected() {
        let server = make_server();

        let resp = server
            .router()
            .oneshot(get("/context?lat=1&lat=2&lon=3"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["location"]["lat"], 2.0);
        assert_eq!(json["data"]["location"]["lon"], 3.0);

        let snapshot = body_json(server.router().oneshot(get("/context")).await.unwrap()).await;
        let hash = snapshot["hash"].as_str().unwrap().to_string();
        let resp = server
            .router()
            .oneshot(get(&format!("/context/delta?sinceHash=a&sinceHash={hash}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"], serde_json::json!({}));
        assert_eq!(json["hash"], hash.as_str());
    }

    #[tokio::test]
    async fn post_context_uses_body_hint() {
        let req = Request::builder()
            .method("POST")
            .uri("/context")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"locationHint":{"lat":48.2082,"lon":16.3738,"countryCode":"AT"}}"#,
            ))
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["location"]["countryCode"], "AT");
        assert_eq!(json["data"]["location"]["city"], "Karlsruhe");
    }

    #[tokio::test]
    async fn post_context_with_garbage_body_still_succeeds() {
        let req = Request::builder()
            .method("POST")
            .uri("/context")
            .body(Body::from("{{{"))
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["location"]["lon"], 8.4037);
    }

    #[tokio::test]
    async fn delta_round_trip() {
        let server = make_server();

        let snapshot = body_json(server.router().oneshot(get("/context")).await.unwrap()).await;
        let hash = snapshot["hash"].as_str().unwrap().to_string();

        let unchanged = body_json(
            server
                .router()
                .oneshot(get(&format!("/context/delta?sinceHash={hash}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(unchanged["type"], "context-delta");
        assert_eq!(unchanged["data"], serde_json::json!({}));
        assert_eq!(unchanged["hash"], hash.as_str());

        let absent =
            body_json(server.router().oneshot(get("/context/delta")).await.unwrap()).await;
        assert_eq!(absent["data"], serde_json::json!({}));
        assert_eq!(absent["hash"], hash.as_str());

        let stale = body_json(
            server
                .router()
                .oneshot(get("/context/delta?sinceHash=stale"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(stale["data"], snapshot["data"]);
        assert_eq!(stale["hash"], hash.as_str());
    }

    #[tokio::test]
    async fn provider_outage_is_not_an_http_error() {
        let aggregator = ContextAggregator::new(
            Arc::new(FailingHolidays::default()),
            Arc::new(FailingWeather::default()),
        );
        let server = EnvctxServer::new(ServerConfig::default(), service(aggregator));
        let resp = server.router().oneshot(get("/context")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["holidays"], serde_json::json!([]));
        assert!(json["data"]["weather"].is_null());
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_404() {
        let resp = make_server().router().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_with_handle_is_prometheus_text() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let server = make_server().with_metrics(handle);
        let resp = server.router().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let resp = make_server().router().oneshot(get("/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serve_stops_on_cancel() {
        let server = make_server();
        let listener = server.bind().await.unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(server.serve(listener, cancel.clone()));

        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
