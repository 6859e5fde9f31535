//! Open-Meteo current weather provider.
//!
//! `GET {base}/forecast?latitude=..&longitude=..&current=...` returns a
//! `current` object keyed by variable name. Each numeric variable is
//! converted independently: a value that is neither a number nor a numeric
//! string becomes `None` and is reported in the partial outcome instead of
//! failing the fetch.

use std::time::Duration;

use async_trait::async_trait;
use envctx_core::types::weather::OPEN_METEO_PROVIDER;
use envctx_core::{FetchOutcome, ProviderError, WeatherSnapshot};
use serde_json::Value;
use tracing::debug;

use crate::http::{build_client, provider_error};
use crate::traits::WeatherProvider;

/// Public base URL (including the API version prefix).
pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1";

const CURRENT_VARIABLES: &str = "temperature_2m,precipitation,wind_speed_10m,weather_code";

/// Weather provider backed by the Open-Meteo forecast API.
pub struct OpenMeteoWeatherProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoWeatherProvider {
    /// Create a provider against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<(WeatherSnapshot, Vec<String>), ProviderError> {
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));
        debug!(%url, lat, lon, "fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_VARIABLES.to_string()),
            ])
            .send()
            .await
            .map_err(|e| provider_error(OPEN_METEO_PROVIDER, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: OPEN_METEO_PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| provider_error(OPEN_METEO_PROVIDER, &e))?;

        parse_current(&body)
    }
}

/// Convert a forecast response body into a snapshot plus skipped fields.
fn parse_current(body: &Value) -> Result<(WeatherSnapshot, Vec<String>), ProviderError> {
    let Some(root) = body.as_object() else {
        return Err(ProviderError::Decode {
            provider: OPEN_METEO_PROVIDER,
            message: "expected a JSON object".to_string(),
        });
    };

    let mut skipped = Vec::new();
    let empty = serde_json::Map::new();
    let current = match root.get("current") {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => {
            skipped.push("current: block missing".to_string());
            &empty
        }
        Some(_) => {
            skipped.push("current: not an object".to_string());
            &empty
        }
    };

    let mut field = |name: &str| {
        let value = current.get(name);
        let number = value.and_then(num_or_none);
        if number.is_none() && value.is_some_and(|v| !v.is_null()) {
            skipped.push(format!("{name}: not a number"));
        }
        number
    };

    let temperature_c = field("temperature_2m");
    let wind_kph = field("wind_speed_10m");
    let precipitation_mm = field("precipitation");
    let summary = field("weather_code").and_then(wmo_summary).map(str::to_string);

    let snapshot = WeatherSnapshot {
        provider: OPEN_METEO_PROVIDER.to_string(),
        temperature_c,
        wind_kph,
        precipitation_mm,
        summary,
    };
    Ok((snapshot, skipped))
}

/// A JSON number, or a string holding one. Everything else is `None`.
pub fn num_or_none(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Short English description of a WMO weather interpretation code.
pub fn wmo_summary(code: f64) -> Option<&'static str> {
    if code.fract() != 0.0 || !(0.0..=99.0).contains(&code) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let summary = match code as u8 {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow fall",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => return None,
    };
    Some(summary)
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeatherProvider {
    fn name(&self) -> &'static str {
        OPEN_METEO_PROVIDER
    }

    async fn current(&self, lat: f64, lon: f64) -> FetchOutcome<WeatherSnapshot> {
        match self.fetch(lat, lon).await {
            Ok((snapshot, skipped)) => FetchOutcome::from_parts(snapshot, skipped),
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider(server: &MockServer) -> OpenMeteoWeatherProvider {
        OpenMeteoWeatherProvider::new(format!("{}/v1", server.uri()), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn parses_current_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "49.0069"))
            .and(query_param("longitude", "8.4037"))
            .and(query_param("current", CURRENT_VARIABLES))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 49.0,
                "longitude": 8.4,
                "current": {
                    "time": "2025-03-03T08:00",
                    "interval": 900,
                    "temperature_2m": 7.4,
                    "precipitation": 0.0,
                    "wind_speed_10m": 11.2,
                    "weather_code": 3
                }
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server).current(49.0069, 8.4037).await;
        let snapshot = assert_matches!(outcome, FetchOutcome::Complete(s) => s);
        assert_eq!(snapshot.provider, "open-meteo");
        assert_eq!(snapshot.temperature_c, Some(7.4));
        assert_eq!(snapshot.wind_kph, Some(11.2));
        assert_eq!(snapshot.precipitation_mm, Some(0.0));
        assert_eq!(snapshot.summary.as_deref(), Some("Overcast"));
    }

    #[tokio::test]
    async fn unparseable_field_is_individually_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {
                    "temperature_2m": "n/a",
                    "precipitation": "0.4",
                    "wind_speed_10m": 5
                }
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server).current(1.0, 2.0).await;
        let (snapshot, skipped) =
            assert_matches!(outcome, FetchOutcome::Partial { value, skipped } => (value, skipped));
        assert_eq!(snapshot.temperature_c, None);
        assert_eq!(snapshot.precipitation_mm, Some(0.4));
        assert_eq!(snapshot.wind_kph, Some(5.0));
        assert_eq!(skipped, vec!["temperature_2m: not a number".to_string()]);
    }

    #[tokio::test]
    async fn http_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let outcome = provider(&server).current(1.0, 2.0).await;
        assert_matches!(
            outcome,
            FetchOutcome::Failed(ProviderError::Status { status: 429, .. })
        );
    }

    #[tokio::test]
    async fn non_json_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .mount(&server)
            .await;

        let outcome = provider(&server).current(1.0, 2.0).await;
        assert_matches!(outcome, FetchOutcome::Failed(ProviderError::Decode { .. }));
    }

    #[test]
    fn missing_current_block_yields_empty_snapshot() {
        let (snapshot, skipped) = parse_current(&json!({"latitude": 1.0})).unwrap();
        assert_eq!(snapshot, WeatherSnapshot::empty(OPEN_METEO_PROVIDER));
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn null_fields_are_absent_without_skip() {
        let (snapshot, skipped) =
            parse_current(&json!({"current": {"temperature_2m": null}})).unwrap();
        assert!(snapshot.temperature_c.is_none());
        assert!(skipped.is_empty());
    }

    #[test]
    fn array_body_is_decode_error() {
        assert!(matches!(
            parse_current(&json!([1, 2])),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn num_or_none_cases() {
        assert_eq!(num_or_none(&json!(3)), Some(3.0));
        assert_eq!(num_or_none(&json!(-1.5)), Some(-1.5));
        assert_eq!(num_or_none(&json!(" 2.25 ")), Some(2.25));
        assert_eq!(num_or_none(&json!("NaN")), None);
        assert_eq!(num_or_none(&json!(true)), None);
        assert_eq!(num_or_none(&json!({"v": 1})), None);
        assert_eq!(num_or_none(&Value::Null), None);
    }

    #[test]
    fn wmo_codes() {
        assert_eq!(wmo_summary(0.0), Some("Clear sky"));
        assert_eq!(wmo_summary(63.0), Some("Rain"));
        assert_eq!(wmo_summary(81.0), Some("Rain showers"));
        assert_eq!(wmo_summary(99.0), Some("Thunderstorm with hail"));
        assert_eq!(wmo_summary(4.0), None);
        assert_eq!(wmo_summary(2.5), None);
        assert_eq!(wmo_summary(-1.0), None);
    }
}
