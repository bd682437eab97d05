//! Open-Meteo geocoding client.
//!
//! Resolves a free-text city name to coordinates. The pipeline only ever needs
//! the single best match, and treats every transport-level failure as "no
//! match": callers see one outcome for both, on purpose.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::model::ResolvedLocation;

#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The HTTP client could not be built or the connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The geocoding service answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Resolves city names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a name to its single best match, or `None` when the name is
    /// unknown or the geocoding service could not be reached.
    async fn resolve(&self, name: &str) -> Option<ResolvedLocation>;
}

/// Geocoder backed by the Open-Meteo geocoding API.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodingError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn search(&self, name: &str) -> Result<Option<ResolvedLocation>, GeocodingError> {
        let url = format!("{}/search", self.base_url);

        debug!(url = %url, name = %name, "Searching for location");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let parsed: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        Ok(parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(GeocodingMatch::into_location))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Option<ResolvedLocation> {
        match self.search(name).await {
            Ok(result) => result,
            Err(e) => {
                // Folded into "not found" deliberately; see DESIGN.md.
                warn!(error = %e, name = %name, "Geocoding failed, reporting as not found");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingMatch>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingMatch {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
    admin1: Option<String>,
}

impl GeocodingMatch {
    fn into_location(self) -> ResolvedLocation {
        let display_name = [Some(self.name), self.admin1, self.country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        ResolvedLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_all_parts() {
        let m = GeocodingMatch {
            latitude: 52.52,
            longitude: 13.41,
            name: "Berlin".to_string(),
            country: Some("Germany".to_string()),
            admin1: Some("Berlin".to_string()),
        };

        assert_eq!(m.into_location().display_name, "Berlin, Berlin, Germany");
    }

    #[test]
    fn display_name_skips_missing_parts() {
        let m = GeocodingMatch {
            latitude: 0.0,
            longitude: 0.0,
            name: "Null Island".to_string(),
            country: None,
            admin1: None,
        };

        assert_eq!(m.into_location().display_name, "Null Island");
    }

    #[test]
    fn display_name_skips_empty_strings() {
        let m = GeocodingMatch {
            latitude: 35.68,
            longitude: 139.69,
            name: "Tokyo".to_string(),
            country: Some("Japan".to_string()),
            admin1: Some(String::new()),
        };

        assert_eq!(m.into_location().display_name, "Tokyo, Japan");
    }

    #[test]
    fn empty_results_decode_as_no_match() {
        let parsed: GeocodingResponse =
            serde_json::from_str("{\"generationtime_ms\": 0.5}").expect("should decode");
        assert!(parsed.results.is_none());
    }
}
