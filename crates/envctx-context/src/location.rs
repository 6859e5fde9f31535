//! Location resolution with a fixed fallback.

use envctx_core::{LocationHint, ResolvedLocation};

/// Fallback latitude.
pub const DEFAULT_LAT: f64 = 49.0069;
/// Fallback longitude.
pub const DEFAULT_LON: f64 = 8.4037;
/// Fallback city, also used when a hint has coordinates but no city.
pub const DEFAULT_CITY: &str = "Karlsruhe";
/// Fallback country, also used when a hint has coordinates but no country.
pub const DEFAULT_COUNTRY_CODE: &str = "DE";

/// The fixed fallback location.
pub fn default_location() -> ResolvedLocation {
    ResolvedLocation {
        lat: DEFAULT_LAT,
        lon: DEFAULT_LON,
        city: Some(DEFAULT_CITY.to_string()),
        country_code: Some(DEFAULT_COUNTRY_CODE.to_string()),
        region: None,
    }
}

/// Resolve an optional hint into a complete location.
///
/// A hint is only honored when it carries both coordinates; otherwise the
/// whole hint is ignored. Missing or blank city and country fall back per
/// field; the region is passed through as given.
pub fn resolve_location(hint: Option<&LocationHint>) -> ResolvedLocation {
    let Some(hint) = hint else {
        return default_location();
    };
    let (Some(lat), Some(lon)) = (hint.lat, hint.lon) else {
        return default_location();
    };

    ResolvedLocation {
        lat,
        lon,
        city: Some(non_blank(hint.city.as_deref()).unwrap_or(DEFAULT_CITY).to_string()),
        country_code: Some(
            non_blank(hint.country_code.as_deref())
                .unwrap_or(DEFAULT_COUNTRY_CODE)
                .to_string(),
        ),
        region: hint.region.clone(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
