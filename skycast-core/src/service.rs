//! The shared request handler behind every transport.
//!
//! One linear pipeline: validate, geocode, fetch, normalize, package. Each
//! transport marshals its native input into the argument map and serializes
//! the returned envelope; nothing transport-specific lives here.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::{sync::Arc, time::Duration};
use tracing::{info, instrument};

use crate::{
    args::{DEFAULT_DAILY_DAYS, validate_args},
    config::ServerConfig,
    envelope::{ResultEnvelope, package},
    forecast::{ForecastFetcher, ForecastQuery, OpenMeteoForecast},
    geocoding::{Geocoder, OpenMeteoGeocoder},
    model::{Format, Mode},
    normalize,
};

/// Pipeline checkpoints announced to interested transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    ResolvingLocation,
    FetchingForecast,
    BuildingReport,
}

impl ProgressStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::ResolvingLocation => "resolving_location",
            ProgressStage::FetchingForecast => "fetching_forecast",
            ProgressStage::BuildingReport => "building_report",
        }
    }
}

/// Fire-and-forget progress listener.
///
/// Emissions must never block or fail the pipeline; implementations drop
/// whatever they cannot deliver.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, stage: ProgressStage);
}

/// Sink for transports that do not surface progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _stage: ProgressStage) {}
}

/// The weather tool handler shared by all transports.
#[derive(Debug, Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastFetcher>,
    default_format: Format,
}

impl WeatherService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastFetcher>,
        default_format: Format,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            default_format,
        }
    }

    /// Build a service with real Open-Meteo clients from config.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let geocoder = OpenMeteoGeocoder::new(&config.geocoding_base_url, timeout)
            .context("Failed to build geocoding client")?;
        let forecast = OpenMeteoForecast::new(&config.forecast_base_url, timeout)
            .context("Failed to build forecast client")?;

        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(forecast),
            config.default_format(),
        ))
    }

    /// Handle one tool call without progress reporting.
    pub async fn get_weather(&self, args: &Map<String, Value>) -> ResultEnvelope {
        self.get_weather_with_progress(args, &NoProgress).await
    }

    /// Handle one tool call, announcing checkpoints along the way.
    ///
    /// Never fails: every outcome, including every error, is an envelope.
    #[instrument(skip(self, args, progress))]
    pub async fn get_weather_with_progress(
        &self,
        args: &Map<String, Value>,
        progress: &dyn ProgressSink,
    ) -> ResultEnvelope {
        let request = match validate_args(args, self.default_format) {
            Ok(request) => request,
            Err(issues) => return ResultEnvelope::invalid_arguments(&issues),
        };

        progress.emit(ProgressStage::ResolvingLocation);
        let Some(location) = self.geocoder.resolve(&request.city).await else {
            return ResultEnvelope::text_error(format!("Location '{}' not found", request.city));
        };

        info!(city = %request.city, location = %location.display_name, mode = %request.mode, "Resolved location");

        progress.emit(ProgressStage::FetchingForecast);
        let query = ForecastQuery::build(&request, &location);
        let response = match self.forecast.fetch(&query).await {
            Ok(response) => response,
            Err(e) => return ResultEnvelope::text_error(format!("Failed to fetch weather: {e}")),
        };

        progress.emit(ProgressStage::BuildingReport);
        let report = match request.mode {
            Mode::Current => {
                normalize::current_report(&location.display_name, request.units, &response)
                    .map(to_value)
            }
            Mode::Hourly => {
                normalize::hourly_report(&location.display_name, request.units, &response)
                    .map(to_value)
            }
            Mode::Daily => {
                let days = query.forecast_days.unwrap_or(DEFAULT_DAILY_DAYS);
                normalize::daily_report(&location.display_name, request.units, days, &response)
                    .map(to_value)
            }
        };

        match report {
            Some(payload) => package(request.format, payload, false),
            None => package(
                request.format,
                json!({
                    "error": format!("missing_{}", request.mode),
                    "message": format!("Forecast response contained no {} data", request.mode),
                }),
                true,
            ),
        }
    }
}

fn to_value<T: serde::Serialize>(report: T) -> Value {
    serde_json::to_value(report).unwrap_or_else(|_| json!({}))
}
