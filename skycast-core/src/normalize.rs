//! Shaping of raw forecast documents into reports.
//!
//! All physical quantities are rounded to one decimal place, half away from
//! zero. Anything missing or non-finite becomes null rather than a guess.

use chrono::DateTime;

use crate::{
    forecast::ForecastResponse,
    model::{CurrentReport, DailyReport, DaySample, HourSample, HourlyReport, Units},
};

/// Hourly reports never carry more than one day of samples.
pub const MAX_HOURLY_SAMPLES: usize = 24;

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Apply the numeric policy: finite values are rounded, the rest become null.
fn clean(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(round1)
}

/// Render a provider timestamp as local wall-clock time.
///
/// Provider times are epoch seconds in UTC; adding the reported offset and
/// formatting the shifted instant as UTC yields the location's wall clock.
fn local_time(epoch_secs: i64, utc_offset_seconds: i64, format: &str) -> String {
    let shifted = epoch_secs + utc_offset_seconds;
    DateTime::from_timestamp(shifted, 0)
        .map_or_else(|| shifted.to_string(), |dt| dt.format(format).to_string())
}

/// Current conditions, or `None` when the response has no `current` section.
pub fn current_report(
    location: &str,
    units: Units,
    response: &ForecastResponse,
) -> Option<CurrentReport> {
    let block = response.current.as_ref()?;

    Some(CurrentReport {
        location: location.to_string(),
        temperature: clean(block.temperature_2m),
        wind_speed: clean(block.wind_speed_10m),
        temperature_unit: units.temperature_label(),
        wind_speed_unit: units.wind_speed_label(),
    })
}

/// Up to 24 hourly samples, or `None` when the response has no `hourly`
/// section.
///
/// The output length is the minimum across the aligned arrays, which guards
/// against providers returning arrays of mismatched length.
pub fn hourly_report(
    location: &str,
    units: Units,
    response: &ForecastResponse,
) -> Option<HourlyReport> {
    let block = response.hourly.as_ref()?;

    let len = MAX_HOURLY_SAMPLES
        .min(block.time.len())
        .min(block.temperature_2m.len())
        .min(block.wind_speed_10m.len());

    let hours = (0..len)
        .map(|i| HourSample {
            time: local_time(block.time[i], response.utc_offset_seconds, "%Y-%m-%d %H:%M"),
            temperature: clean(block.temperature_2m[i]),
            wind_speed: clean(block.wind_speed_10m[i]),
        })
        .collect();

    Some(HourlyReport {
        location: location.to_string(),
        temperature_unit: units.temperature_label(),
        wind_speed_unit: units.wind_speed_label(),
        hours,
    })
}

/// Daily samples, or `None` when the response has no `daily` section.
///
/// `days` is the horizon that was requested, echoed as-is; the row count is
/// the minimum across all five aligned arrays.
pub fn daily_report(
    location: &str,
    units: Units,
    days: u8,
    response: &ForecastResponse,
) -> Option<DailyReport> {
    let block = response.daily.as_ref()?;

    let len = block
        .time
        .len()
        .min(block.temperature_2m_max.len())
        .min(block.temperature_2m_min.len())
        .min(block.precipitation_sum.len())
        .min(block.wind_speed_10m_max.len());

    let daily = (0..len)
        .map(|i| DaySample {
            date: local_time(block.time[i], response.utc_offset_seconds, "%Y-%m-%d"),
            temperature_max: clean(block.temperature_2m_max[i]),
            temperature_min: clean(block.temperature_2m_min[i]),
            precipitation_sum: clean(block.precipitation_sum[i]),
            wind_speed_max: clean(block.wind_speed_10m_max[i]),
        })
        .collect();

    Some(DailyReport {
        location: location.to_string(),
        days,
        temperature_unit: units.temperature_label(),
        wind_speed_unit: units.wind_speed_label(),
        precipitation_unit: "mm",
        daily,
    })
}
