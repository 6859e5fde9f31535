//! Public holiday record.

use serde::{Deserialize, Serialize};

/// A public holiday for a country, optionally restricted to regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Localized holiday name.
    pub local_name: String,
    /// ISO-3166-1 alpha-2 country code.
    pub country_code: String,
    /// ISO-3166-2 region codes the holiday applies to; `None` means nationwide.
    pub regions: Option<Vec<String>>,
}
