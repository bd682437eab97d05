use serde::Serialize;

/// Measurement system for temperatures and wind speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Value for the provider's `temperature_unit` parameter.
    pub fn temperature_param(&self) -> &'static str {
        match self {
            Units::Metric => "celsius",
            Units::Imperial => "fahrenheit",
        }
    }

    /// Value for the provider's `windspeed_unit` parameter.
    pub fn windspeed_param(&self) -> &'static str {
        match self {
            Units::Metric => "kmh",
            Units::Imperial => "mph",
        }
    }

    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Which report shape a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Current,
    Hourly,
    Daily,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Current => "current",
            Mode::Hourly => "hourly",
            Mode::Daily => "daily",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Mode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "current" => Ok(Mode::Current),
            "hourly" => Ok(Mode::Hourly),
            "daily" => Ok(Mode::Daily),
            _ => Err(anyhow::anyhow!(
                "Unknown mode '{value}'. Supported modes: current, hourly, daily."
            )),
        }
    }
}

/// How the final payload is carried in the result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Text,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Text => "text",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Format {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "json" => Ok(Format::Json),
            "text" => Ok(Format::Text),
            _ => Err(anyhow::anyhow!(
                "Unknown format '{value}'. Supported formats: json, text."
            )),
        }
    }
}

/// A fully validated weather request.
#[derive(Debug, Clone)]
pub struct WeatherArgs {
    pub city: String,
    pub units: Units,
    pub mode: Mode,
    /// Forecast horizon in days. Only meaningful when `mode` is daily.
    pub days: Option<u8>,
    pub format: Format,
}

/// A geocoded city, owned by the in-flight request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentReport {
    pub location: String,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub temperature_unit: &'static str,
    pub wind_speed_unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourSample {
    pub time: String,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyReport {
    pub location: String,
    pub temperature_unit: &'static str,
    pub wind_speed_unit: &'static str,
    pub hours: Vec<HourSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySample {
    pub date: String,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub wind_speed_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub location: String,
    /// The horizon that was requested from the provider, not the row count.
    pub days: u8,
    pub temperature_unit: &'static str,
    pub wind_speed_unit: &'static str,
    pub precipitation_unit: &'static str,
    pub daily: Vec<DaySample>,
}
