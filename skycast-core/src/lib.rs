//! Core library for the `skycast` weather tool server.
//!
//! This crate defines:
//! - Configuration handling
//! - Validation of untyped tool arguments
//! - Geocoding and forecast clients (Open-Meteo)
//! - Normalization of raw forecast data into reports
//! - The shared request handler every transport delegates to
//!
//! It is used by `skycast-server`, but can also be reused by other binaries
//! or embedded in other services.

pub mod args;
pub mod config;
pub mod envelope;
pub mod forecast;
pub mod geocoding;
pub mod model;
pub mod normalize;
pub mod service;

pub use args::{ArgumentIssue, validate_args};
pub use config::ServerConfig;
pub use envelope::{ResultContent, ResultEnvelope};
pub use forecast::{ForecastError, ForecastFetcher, ForecastQuery, OpenMeteoForecast};
pub use geocoding::{Geocoder, GeocodingError, OpenMeteoGeocoder};
pub use model::{Format, Mode, ResolvedLocation, Units, WeatherArgs};
pub use service::{NoProgress, ProgressSink, ProgressStage, WeatherService};
