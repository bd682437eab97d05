use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Format;

/// Environment toggle that forces text output when no `format` argument is given.
pub const TEXT_OUTPUT_ENV: &str = "SKYCAST_TEXT_OUTPUT";

/// Server configuration, stored on disk as TOML.
///
/// Every field has a default so a missing or partial config file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Open-Meteo geocoding API base URL.
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Open-Meteo forecast API base URL.
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Timeout for each outbound call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bind host for the HTTP transport.
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// Bind port for the HTTP transport.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// When true, results default to text payloads instead of structured JSON.
    #[serde(default)]
    pub text_output: bool,
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_http_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            forecast_base_url: default_forecast_base_url(),
            timeout_secs: default_timeout(),
            http_host: default_http_host(),
            http_port: default_http_port(),
            text_output: false,
        }
    }
}

impl ServerConfig {
    /// Load config from disk, or return defaults if no file exists yet.
    ///
    /// The environment toggle is applied on top of whatever the file says, so
    /// it wins either way.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The output format used when a request does not name one.
    pub fn default_format(&self) -> Format {
        if self.text_output { Format::Text } else { Format::Json }
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(TEXT_OUTPUT_ENV) {
            let value = value.trim();
            if value == "1" || value.eq_ignore_ascii_case("true") {
                self.text_output = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.geocoding_base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(cfg.forecast_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.http_port, 8787);
        assert!(!cfg.text_output);
    }

    #[test]
    fn default_format_follows_toggle() {
        let mut cfg = ServerConfig::default();
        assert_eq!(cfg.default_format(), Format::Json);

        cfg.text_output = true;
        assert_eq!(cfg.default_format(), Format::Text);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: ServerConfig =
            toml::from_str("forecast_base_url = \"http://localhost:9000\"\n")
                .expect("partial config should parse");

        assert_eq!(cfg.forecast_base_url, "http://localhost:9000");
        assert_eq!(cfg.geocoding_base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn config_serializes_roundtrip() {
        let cfg = ServerConfig {
            http_port: 9999,
            text_output: true,
            ..Default::default()
        };

        let toml = toml::to_string_pretty(&cfg).expect("config should serialize");
        let parsed: ServerConfig = toml::from_str(&toml).expect("config should deserialize");

        assert_eq!(parsed.http_port, 9999);
        assert!(parsed.text_output);
    }
}
