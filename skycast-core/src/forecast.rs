//! Open-Meteo forecast client and request construction.
//!
//! The variable lists requested here and the fields of the response structs
//! below must stay in sync: the normalizer reads exactly the variables the
//! query names.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    args::{DEFAULT_DAILY_DAYS, MAX_DAILY_DAYS, MIN_DAILY_DAYS},
    model::{Mode, ResolvedLocation, Units, WeatherArgs},
};

const CURRENT_VARIABLES: &str = "temperature_2m,wind_speed_10m";
const HOURLY_VARIABLES: &str = "temperature_2m,wind_speed_10m";
const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";

/// Hourly requests fetch two days so the 24-hour window can always be filled.
const HOURLY_FORECAST_DAYS: u8 = 2;

#[derive(Debug, Error)]
pub enum ForecastError {
    /// The HTTP client could not be built or the connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The forecast service answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: String, body: String },

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Derived parameters for one forecast fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub units: Units,
    pub mode: Mode,
    /// Horizon sent to the provider. `None` for current conditions.
    pub forecast_days: Option<u8>,
}

impl ForecastQuery {
    /// Derive the provider query from a validated request and its location.
    ///
    /// The daily horizon is clamped here even though validation already
    /// bounds it, so the echoed value and the requested value cannot drift.
    pub fn build(request: &WeatherArgs, location: &ResolvedLocation) -> Self {
        let forecast_days = match request.mode {
            Mode::Current => None,
            Mode::Hourly => Some(HOURLY_FORECAST_DAYS),
            Mode::Daily => Some(
                request
                    .days
                    .unwrap_or(DEFAULT_DAILY_DAYS)
                    .clamp(MIN_DAILY_DAYS, MAX_DAILY_DAYS),
            ),
        };

        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            units: request.units,
            mode: request.mode,
            forecast_days,
        }
    }

    /// Query parameters for the provider's `/forecast` endpoint.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("timezone", "auto".to_string()),
            ("timeformat", "unixtime".to_string()),
            ("temperature_unit", self.units.temperature_param().to_string()),
            ("windspeed_unit", self.units.windspeed_param().to_string()),
        ];

        match self.mode {
            Mode::Current => params.push(("current", CURRENT_VARIABLES.to_string())),
            Mode::Hourly => params.push(("hourly", HOURLY_VARIABLES.to_string())),
            Mode::Daily => params.push(("daily", DAILY_VARIABLES.to_string())),
        }

        if let Some(days) = self.forecast_days {
            params.push(("forecast_days", days.to_string()));
        }

        params
    }
}

/// Fetches raw forecast data for a set of coordinates.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse, ForecastError>;
}

/// Forecast fetcher backed by the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    base_url: String,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoForecast {
    #[instrument(skip(self, query), fields(lat = %query.latitude, lon = %query.longitude, mode = %query.mode))]
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse, ForecastError> {
        let url = format!("{}/forecast", self.base_url);

        debug!(url = %url, "Fetching forecast");

        let response = self
            .http
            .get(&url)
            .query(&query.query_params())
            .send()
            .await
            .map_err(|e| ForecastError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ForecastError::RequestFailed {
                status: status.to_string(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ForecastError::ParseError(e.to_string()))
    }
}

/// Raw forecast document, decoded as loosely as possible.
///
/// Sections and values may be missing; the normalizer decides what that means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub utc_offset_seconds: i64,
    pub current: Option<CurrentBlock>,
    pub hourly: Option<HourlyBlock>,
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m_max: Vec<Option<f64>>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
