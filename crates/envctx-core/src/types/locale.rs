//! Language and locale.

use serde::{Deserialize, Serialize};

/// Primary language and full locale tag, e.g. `de` / `de-DE`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
    /// Language tag.
    pub language: String,
    /// Full locale tag.
    pub locale: String,
}
