//! `Accept-Language` parsing.

use envctx_core::LocaleInfo;

/// Locale used when the header is absent or blank.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Take the first comma-separated tag of `raw` as the locale and the part
/// before its first hyphen as the language. Weights are not interpreted.
pub fn parse_locale(raw: Option<&str>) -> LocaleInfo {
    let primary = raw
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .unwrap_or(DEFAULT_LOCALE);

    let language = primary.split('-').next().unwrap_or(primary);

    LocaleInfo {
        language: language.to_string(),
        locale: primary.to_string(),
    }
}
