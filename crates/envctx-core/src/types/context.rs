//! The aggregated environment context.

use serde::{Deserialize, Serialize};

use super::{Holiday, LocaleInfo, ResolvedLocation, TemporalContext, WeatherSnapshot};

/// Location, time, holidays, weather and locale in one value.
///
/// This is the unit that gets fingerprinted for change detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentContext {
    /// Resolved location.
    pub location: ResolvedLocation,
    /// Date/time facet.
    pub date_time: TemporalContext,
    /// Public holidays for the location's country and the current year.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Current weather; `None` when the provider was unavailable.
    pub weather: Option<WeatherSnapshot>,
    /// Locale derived from the request.
    pub locale: LocaleInfo,
}
