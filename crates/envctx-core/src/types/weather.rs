//! Current weather snapshot.

use serde::{Deserialize, Serialize};

/// Provider tag used by the Open-Meteo adapter.
pub const OPEN_METEO_PROVIDER: &str = "open-meteo";

/// Current weather at the resolved location.
///
/// Every numeric field is independently optional. An all-`None` snapshot
/// means the provider answered without usable values, which is distinct from
/// the context carrying no snapshot at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Provider tag.
    pub provider: String,
    /// Air temperature in °C.
    pub temperature_c: Option<f64>,
    /// Wind speed in km/h.
    pub wind_kph: Option<f64>,
    /// Precipitation in mm.
    pub precipitation_mm: Option<f64>,
    /// Short human-readable summary.
    pub summary: Option<String>,
}

impl WeatherSnapshot {
    /// An empty snapshot for `provider`.
    pub fn empty(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            temperature_c: None,
            wind_kph: None,
            precipitation_mm: None,
            summary: None,
        }
    }
}
