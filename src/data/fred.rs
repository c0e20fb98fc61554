//! FRED API integration for the daily Treasury constant-maturity series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::data::source::YieldSource;
use crate::domain::Tenor;
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from `--api-key` if given, else `FRED_API_KEY` (`.env` is honored).
    pub fn from_env(api_key: Option<String>) -> Result<Self, AppError> {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            return Ok(Self::new(key));
        }
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::Config("Missing FRED_API_KEY in environment (.env).".to_string()))?;
        Ok(Self::new(api_key))
    }
}

impl YieldSource for FredClient {
    fn fetch_series(
        &self,
        tenor: Tenor,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        let series_id = tenor.series_id();
        debug!(series_id, %start, %end, "requesting FRED observations");

        let start = start.to_string();
        let end = end.to_string();
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ])
            .send()
            .map_err(|e| AppError::Fetch(format!("{series_id}: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Fetch(format!(
                "{series_id}: status {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::Fetch(format!("{series_id}: failed to read body: {e}")))?;

        parse_observations(series_id, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// Parse a FRED `series/observations` JSON body into `(date, percent)` pairs.
///
/// Missing values (`"."` or empty) are skipped. A bad date or any other
/// unparsable value fails the whole series.
pub fn parse_observations(series_id: &str, body: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
    let body: ObservationsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Parse(format!("FRED response for {series_id}: {e}")))?;

    let mut out = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
            AppError::Parse(format!("Invalid FRED date '{}' in {series_id}: {e}", obs.date))
        })?;
        let value = parse_value(&obs.value)
            .map_err(|msg| AppError::Parse(format!("{series_id} on {date}: {msg}")))?;
        if let Some(value) = value {
            out.push((date, value));
        }
    }
    out.sort_by_key(|(d, _)| *d);

    Ok(out)
}

fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("invalid yield '{trimmed}'")),
    }
}
