//! Location hint (client input) and resolved location.

use serde::{Deserialize, Serialize};

/// Optional, possibly partial location supplied by a client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationHint {
    /// City name.
    #[serde(default)]
    pub city: Option<String>,
    /// ISO-3166-1 alpha-2 country code (e.g. `"DE"`).
    #[serde(default)]
    pub country_code: Option<String>,
    /// ISO-3166-2 region code (e.g. `"DE-BW"`).
    #[serde(default)]
    pub region: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LocationHint {
    /// Whether both coordinates are present.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// A location guaranteed to carry coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// City name.
    pub city: Option<String>,
    /// ISO-3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// ISO-3166-2 region code.
    pub region: Option<String>,
}
