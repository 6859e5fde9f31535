//! Nager.Date public holiday provider.
//!
//! `GET {base}/api/v3/PublicHolidays/{year}/{countryCode}` returns an array
//! of holiday records. Only `date`, `localName` and `counties` are used;
//! records missing a date or name are skipped and reported as a partial
//! outcome.

use std::time::Duration;

use async_trait::async_trait;
use envctx_core::{FetchOutcome, Holiday, ProviderError};
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, provider_error};
use crate::traits::HolidayProvider;

/// Provider name.
pub const NAGER_PROVIDER: &str = "nager";

/// Public base URL.
pub const NAGER_BASE_URL: &str = "https://date.nager.at";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    date: Option<String>,
    local_name: Option<String>,
    counties: Option<Vec<String>>,
}

/// Holiday provider backed by the Nager.Date REST API.
pub struct NagerHolidayProvider {
    client: reqwest::Client,
    base_url: String,
}

impl NagerHolidayProvider {
    /// Create a provider against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, country_code: &str, year: i32) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| ProviderError::Transport {
            provider: NAGER_PROVIDER,
            message: format!("invalid base URL: {e}"),
        })?;
        let year = year.to_string();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ProviderError::Transport {
                provider: NAGER_PROVIDER,
                message: "base URL cannot carry a path".to_string(),
            })?;
            let _ = segments
                .pop_if_empty()
                .extend(["api", "v3", "PublicHolidays", year.as_str(), country_code]);
        }
        Ok(url)
    }

    async fn fetch(
        &self,
        country_code: &str,
        year: i32,
    ) -> Result<(Vec<Holiday>, Vec<String>), ProviderError> {
        let url = self.endpoint(country_code, year)?;
        debug!(%url, "fetching holidays");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| provider_error(NAGER_PROVIDER, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: NAGER_PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| provider_error(NAGER_PROVIDER, &e))?;
        if body.is_empty() {
            // 204 No Content for countries without data
            return Ok((Vec::new(), Vec::new()));
        }

        let records: Vec<NagerHoliday> =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
                provider: NAGER_PROVIDER,
                message: e.to_string(),
            })?;

        Ok(convert_records(records, country_code))
    }
}

fn convert_records(records: Vec<NagerHoliday>, country_code: &str) -> (Vec<Holiday>, Vec<String>) {
    let mut holidays = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match (record.date, record.local_name) {
            (Some(date), Some(local_name)) if !date.is_empty() && !local_name.is_empty() => {
                holidays.push(Holiday {
                    date,
                    local_name,
                    country_code: country_code.to_string(),
                    regions: record.counties.filter(|c| !c.is_empty()),
                });
            }
            _ => skipped.push(format!("record {index}: missing date or localName")),
        }
    }

    (holidays, skipped)
}

#[async_trait]
impl HolidayProvider for NagerHolidayProvider {
    fn name(&self) -> &'static str {
        NAGER_PROVIDER
    }

    async fn holidays(&self, country_code: &str, year: i32) -> FetchOutcome<Vec<Holiday>> {
        match self.fetch(country_code, year).await {
            Ok((holidays, skipped)) => FetchOutcome::from_parts(holidays, skipped),
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}
