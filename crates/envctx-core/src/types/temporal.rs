//! Temporal facet of the environment context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse four-bucket classification of the local hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfDay {
    /// 05:00–11:59.
    Morning,
    /// 12:00–17:59.
    Afternoon,
    /// 18:00–23:59.
    Evening,
    /// 00:00–04:59.
    Night,
}

impl PartOfDay {
    /// Classify a local hour (0–23).
    ///
    /// Hours above 23 are treated as evening; callers only pass clock hours.
    pub fn from_hour(hour: u32) -> Self {
        if hour < 5 {
            Self::Night
        } else if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    /// Wire name (`"morning"`, `"afternoon"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for PartOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date/time information for the current instant in the service timezone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalContext {
    /// ISO-8601 timestamp with UTC offset.
    pub iso: String,
    /// IANA timezone name.
    pub timezone: String,
    /// English weekday name (`"Monday"`).
    pub weekday: String,
    /// Part-of-day bucket.
    pub part_of_day: PartOfDay,
}
