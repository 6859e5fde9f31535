//! Result of a single upstream fetch.

use crate::errors::ProviderError;

/// Complete, partial or failed fetch.
///
/// `Partial` carries a usable value plus a note for every piece that had to
/// be dropped (an unparseable weather field, a holiday record without a
/// date). The aggregator turns `Failed` into the empty/absent facet.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Everything the provider returned was usable.
    Complete(T),
    /// Usable value with some pieces dropped.
    Partial {
        /// The usable value.
        value: T,
        /// What was dropped and why.
        skipped: Vec<String>,
    },
    /// Nothing usable.
    Failed(ProviderError),
}

impl<T> FetchOutcome<T> {
    /// `Complete` when nothing was skipped, `Partial` otherwise.
    pub fn from_parts(value: T, skipped: Vec<String>) -> Self {
        if skipped.is_empty() {
            Self::Complete(value)
        } else {
            Self::Partial { value, skipped }
        }
    }

    /// Metric label: `complete`, `partial` or `failed`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complete(_) => "complete",
            Self::Partial { .. } => "partial",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether the fetch failed outright.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The usable value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => Some(value),
            Self::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, ProviderError>> for FetchOutcome<T> {
    fn from(result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Self::Complete(value),
            Err(err) => Self::Failed(err),
        }
    }
}
