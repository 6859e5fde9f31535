//! Route handlers and lenient request parsing.
//!
//! None of these handlers produce a client error for malformed location
//! input: unparseable coordinates are dropped, and a hint without both
//! coordinates resolves to the default location downstream.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use envctx_core::metrics::CONTEXT_REQUESTS_TOTAL;
use envctx_core::{ContextEnvelope, LocationHint};
use serde_json::Value;
use tracing::{debug, warn};

use crate::health::{HealthResponse, health_check};
use crate::metrics::{PROMETHEUS_CONTENT_TYPE, render};
use crate::server::AppState;

/// Query parameters of `GET /context` and `GET /context/delta`.
///
/// Coordinates are kept as strings so a bad value drops only that field.
#[derive(Debug, Default, PartialEq)]
pub struct ContextQuery {
    /// Latitude.
    pub lat: Option<String>,
    /// Longitude.
    pub lon: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// ISO-3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// ISO-3166-2 region code.
    pub region: Option<String>,
    /// Hash the caller already holds (delta only).
    pub since_hash: Option<String>,
}

impl ContextQuery {
    /// Parse a raw query string. Repeated keys keep the last value and
    /// unknown keys are ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "lat" => &mut query.lat,
                "lon" => &mut query.lon,
                "city" => &mut query.city,
                "countryCode" => &mut query.country_code,
                "region" => &mut query.region,
                "sinceHash" => &mut query.since_hash,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        query
    }

    /// The location hint carried by the query, if any field is set.
    pub fn location_hint(&self) -> Option<LocationHint> {
        let hint = LocationHint {
            city: non_empty(self.city.as_deref()),
            country_code: non_empty(self.country_code.as_deref()),
            region: non_empty(self.region.as_deref()),
            lat: self.lat.as_deref().and_then(parse_coordinate),
            lon: self.lon.as_deref().and_then(parse_coordinate),
        };
        (hint != LocationHint::default()).then_some(hint)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a finite decimal coordinate.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract `locationHint` from a `POST /context` body.
///
/// Empty, non-JSON or oddly shaped bodies yield `None`. Coordinates may be
/// numbers or numeric strings.
pub fn hint_from_body(body: &[u8]) -> Option<LocationHint> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "ignoring unparseable context request body");
            return None;
        }
    };
    let hint = value.get("locationHint")?.as_object()?;

    let text = |key: &str| non_empty(hint.get(key).and_then(Value::as_str));
    let coordinate = |key: &str| match hint.get(key) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_coordinate(s),
        _ => None,
    };

    Some(LocationHint {
        city: text("city"),
        country_code: text("countryCode"),
        region: text("region"),
        lat: coordinate("lat"),
        lon: coordinate("lon"),
    })
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok())
}

fn count_request(kind: &'static str) {
    metrics::counter!(CONTEXT_REQUESTS_TOTAL, "kind" => kind).increment(1);
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(health_check())
}

/// `GET /context`
pub async fn get_context(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Json<ContextEnvelope> {
    let query = ContextQuery::parse(raw.as_deref());
    count_request("snapshot");
    let hint = query.location_hint();
    debug!(?hint, "snapshot request");
    let envelope = state
        .service
        .build_snapshot(accept_language(&headers), hint.as_ref())
        .await;
    Json(envelope)
}

/// `POST /context`
pub async fn post_context(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<ContextEnvelope> {
    count_request("snapshot");
    let hint = hint_from_body(&body);
    debug!(?hint, "snapshot request");
    let envelope = state
        .service
        .build_snapshot(accept_language(&headers), hint.as_ref())
        .await;
    Json(envelope)
}

/// `GET /context/delta`
pub async fn get_delta(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Json<ContextEnvelope> {
    let query = ContextQuery::parse(raw.as_deref());
    count_request("delta");
    let hint = query.location_hint();
    debug!(?hint, since = ?query.since_hash, "delta request");
    let envelope = state
        .service
        .build_delta(
            accept_language(&headers),
            hint.as_ref(),
            query.since_hash.as_deref(),
        )
        .await;
    Json(envelope)
}

/// `GET /metrics`
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.as_ref() {
        Some(handle) => ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], render(handle)).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
