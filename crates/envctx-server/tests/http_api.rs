//! End-to-end HTTP tests against wiremock-backed upstream providers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use envctx_context::temporal::DEFAULT_TIMEZONE;
use envctx_context::{ContextAggregator, ContextService, FixedClock};
use envctx_providers::{NagerHolidayProvider, OpenMeteoWeatherProvider};
use envctx_server::{EnvctxServer, ServerConfig};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Upstreams {
    nager: MockServer,
    meteo: MockServer,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            nager: MockServer::start().await,
            meteo: MockServer::start().await,
        }
    }

    async fn healthy(self) -> Self {
        Mock::given(method("GET"))
            .and(path("/api/v3/PublicHolidays/2025/DE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"date": "2025-10-03", "localName": "Tag der Deutschen Einheit", "counties": null},
                {"date": "2025-10-31", "localName": "Reformationstag", "counties": ["DE-BB", "DE-SN"]}
            ])))
            .mount(&self.nager)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "49.0069"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {
                    "temperature_2m": 12.3,
                    "precipitation": 0.2,
                    "wind_speed_10m": 9.0,
                    "weather_code": 61
                }
            })))
            .mount(&self.meteo)
            .await;
        self
    }

    fn server(&self) -> EnvctxServer {
        let timeout = Duration::from_secs(2);
        let aggregator = ContextAggregator::new(
            Arc::new(NagerHolidayProvider::new(self.nager.uri(), timeout)),
            Arc::new(OpenMeteoWeatherProvider::new(
                format!("{}/v1", self.meteo.uri()),
                timeout,
            )),
        );
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 10, 3, 14, 0, 0).unwrap(),
        ));
        let service = Arc::new(ContextService::new(aggregator, clock, DEFAULT_TIMEZONE));
        EnvctxServer::new(ServerConfig::default(), service)
    }
}

struct Running {
    base: String,
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl Running {
    async fn start(server: EnvctxServer) -> Self {
        let listener = server.bind().await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(server.serve(listener, cancel.clone()));
        Self {
            base,
            cancel,
            handle,
        }
    }

    async fn get(&self, path: &str) -> Value {
        let resp = reqwest::get(format!("{}{path}", self.base)).await.unwrap();
        assert!(resp.status().is_success(), "GET {path} -> {}", resp.status());
        resp.json().await.unwrap()
    }

    async fn stop(self) {
        self.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn snapshot_aggregates_upstream_data() {
    let upstreams = Upstreams::start().await.healthy().await;
    let running = Running::start(upstreams.server()).await;

    let json = running.get("/context").await;
    assert_eq!(json["type"], "context-snapshot");
    assert_eq!(json["producedAt"], "2025-10-03T16:00:00+02:00");

    let data = &json["data"];
    assert_eq!(data["dateTime"]["weekday"], "Friday");
    assert_eq!(data["dateTime"]["partOfDay"], "afternoon");
    assert_eq!(data["dateTime"]["timezone"], "Europe/Berlin");
    assert_eq!(data["holidays"].as_array().unwrap().len(), 2);
    assert_eq!(data["holidays"][0]["localName"], "Tag der Deutschen Einheit");
    assert_eq!(data["holidays"][0]["countryCode"], "DE");
    assert_eq!(data["holidays"][1]["regions"], json!(["DE-BB", "DE-SN"]));
    assert_eq!(data["weather"]["provider"], "open-meteo");
    assert_eq!(data["weather"]["temperatureC"], 12.3);
    assert_eq!(data["weather"]["windKph"], 9.0);
    assert_eq!(data["weather"]["precipitationMm"], 0.2);
    assert_eq!(data["weather"]["summary"], "Rain");

    running.stop().await;
}

#[tokio::test]
async fn delta_follows_hash() {
    let upstreams = Upstreams::start().await.healthy().await;
    let running = Running::start(upstreams.server()).await;

    let snapshot = running.get("/context").await;
    let hash = snapshot["hash"].as_str().unwrap().to_string();

    let same = running.get(&format!("/context/delta?sinceHash={hash}")).await;
    assert_eq!(same["type"], "context-delta");
    assert_eq!(same["data"], json!({}));
    assert_eq!(same["hash"], hash.as_str());

    let changed = running.get("/context/delta?sinceHash=0000000000000000").await;
    assert_eq!(changed["data"], snapshot["data"]);
    assert_eq!(changed["hash"], hash.as_str());

    running.stop().await;
}

#[tokio::test]
async fn upstream_outage_degrades_gracefully() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstreams.nager)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&upstreams.meteo)
        .await;
    let running = Running::start(upstreams.server()).await;

    let json = running.get("/context").await;
    assert_eq!(json["data"]["holidays"], json!([]));
    assert!(json["data"]["weather"].is_null());
    assert_eq!(json["data"]["location"]["city"], "Karlsruhe");

    running.stop().await;
}

#[tokio::test]
async fn post_context_routes_hint_to_providers() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/PublicHolidays/2025/AT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2025-10-26", "localName": "Nationalfeiertag"}
        ])))
        .expect(1)
        .mount(&upstreams.nager)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.2082"))
        .and(query_param("longitude", "16.3738"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"current": {}})))
        .expect(1)
        .mount(&upstreams.meteo)
        .await;
    let running = Running::start(upstreams.server()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/context", running.base))
        .header("accept-language", "de-AT")
        .json(&json!({"locationHint": {"lat": 48.2082, "lon": 16.3738, "city": "Wien", "countryCode": "AT"}}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();

    assert_eq!(json["data"]["location"]["city"], "Wien");
    assert_eq!(json["data"]["holidays"][0]["localName"], "Nationalfeiertag");
    assert_eq!(json["data"]["locale"], json!({"language": "de", "locale": "de-AT"}));
    // present but empty, distinct from an absent snapshot
    assert_eq!(json["data"]["weather"]["temperatureC"], Value::Null);
    assert_eq!(json["data"]["weather"]["provider"], "open-meteo");

    running.stop().await;
}

#[tokio::test]
async fn health_over_socket() {
    let upstreams = Upstreams::start().await;
    let running = Running::start(upstreams.server()).await;
    assert_eq!(running.get("/health").await, json!({"ok": true}));
    running.stop().await;
}
