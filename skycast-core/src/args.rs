//! Validation of untyped tool arguments.
//!
//! Every transport hands the same string-keyed JSON map to [`validate_args`],
//! which either produces a typed [`WeatherArgs`] or a list of per-field issues.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{Format, Mode, Units, WeatherArgs};

/// Raw bound on the `days` argument, before the daily-mode refinement.
pub const MIN_RAW_DAYS: i64 = 1;
pub const MAX_RAW_DAYS: i64 = 16;

/// Horizon actually accepted for daily forecasts.
pub const MIN_DAILY_DAYS: u8 = 7;
pub const MAX_DAILY_DAYS: u8 = 10;
pub const DEFAULT_DAILY_DAYS: u8 = 7;

/// One failed check, addressed by the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentIssue {
    pub path: String,
    pub message: String,
}

impl ArgumentIssue {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Validate an untyped argument map into a [`WeatherArgs`].
///
/// Pure function of the input map and the injected default format. Individual
/// field checks run first and all of their issues are collected; the
/// daily-days refinement runs afterwards, mirroring a schema-then-refine
/// validator.
pub fn validate_args(
    args: &Map<String, Value>,
    default_format: Format,
) -> Result<WeatherArgs, Vec<ArgumentIssue>> {
    let mut issues = Vec::new();

    let city = match args.get("city") {
        None | Some(Value::Null) => {
            issues.push(ArgumentIssue::new("city", "city is required"));
            String::new()
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                issues.push(ArgumentIssue::new("city", "city must not be empty"));
            }
            trimmed.to_string()
        }
        Some(_) => {
            issues.push(ArgumentIssue::new("city", "city must be a string"));
            String::new()
        }
    };

    let units: Units = parse_enum(args, "units", &mut issues).unwrap_or_default();
    let mode: Mode = parse_enum(args, "mode", &mut issues).unwrap_or_default();
    let format: Format = parse_enum(args, "format", &mut issues).unwrap_or(default_format);

    let days = match args.get("days") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(n) if (MIN_RAW_DAYS..=MAX_RAW_DAYS).contains(&n) => Some(n as u8),
            Some(_) => {
                issues.push(ArgumentIssue::new(
                    "days",
                    format!("days must be between {MIN_RAW_DAYS} and {MAX_RAW_DAYS}"),
                ));
                None
            }
            None => {
                issues.push(ArgumentIssue::new("days", "days must be an integer"));
                None
            }
        },
    };

    // Refinement: the daily horizon is narrower than the raw bound. Runs even
    // when other fields failed, so the report names every bad field at once.
    if mode == Mode::Daily {
        let effective = days.unwrap_or(DEFAULT_DAILY_DAYS);
        if !(MIN_DAILY_DAYS..=MAX_DAILY_DAYS).contains(&effective) {
            issues.push(ArgumentIssue::new(
                "days",
                format!("daily forecasts support between {MIN_DAILY_DAYS} and {MAX_DAILY_DAYS} days"),
            ));
        }
    }

    if issues.is_empty() {
        Ok(WeatherArgs {
            city,
            units,
            mode,
            days,
            format,
        })
    } else {
        Err(issues)
    }
}

/// Parse an optional enum-valued string field, recording issues.
fn parse_enum<T>(args: &Map<String, Value>, key: &str, issues: &mut Vec<ArgumentIssue>) -> Option<T>
where
    T: for<'a> TryFrom<&'a str, Error = anyhow::Error>,
{
    match args.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match T::try_from(s.as_str()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                issues.push(ArgumentIssue::new(key, e.to_string()));
                None
            }
        },
        Some(_) => {
            issues.push(ArgumentIssue::new(key, format!("{key} must be a string")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().expect("test arguments must be an object").clone()
    }

    #[test]
    fn minimal_arguments_apply_defaults() {
        let parsed = validate_args(&args(json!({"city": "Berlin"})), Format::Json)
            .expect("valid arguments");

        assert_eq!(parsed.city, "Berlin");
        assert_eq!(parsed.units, Units::Metric);
        assert_eq!(parsed.mode, Mode::Current);
        assert_eq!(parsed.days, None);
        assert_eq!(parsed.format, Format::Json);
    }

    #[test]
    fn default_format_is_injected() {
        let parsed = validate_args(&args(json!({"city": "Berlin"})), Format::Text)
            .expect("valid arguments");
        assert_eq!(parsed.format, Format::Text);

        let parsed = validate_args(&args(json!({"city": "Berlin", "format": "json"})), Format::Text)
            .expect("valid arguments");
        assert_eq!(parsed.format, Format::Json);
    }

    #[test]
    fn city_is_trimmed() {
        let parsed = validate_args(&args(json!({"city": "  Oslo  "})), Format::Json)
            .expect("valid arguments");
        assert_eq!(parsed.city, "Oslo");
    }

    #[test]
    fn missing_city_is_reported() {
        let issues = validate_args(&args(json!({})), Format::Json).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "city");
    }

    #[test]
    fn blank_city_is_reported() {
        let issues = validate_args(&args(json!({"city": "   "})), Format::Json).unwrap_err();
        assert_eq!(issues[0].path, "city");
        assert!(issues[0].message.contains("empty"));
    }

    #[test]
    fn non_string_city_is_reported() {
        let issues = validate_args(&args(json!({"city": 42})), Format::Json).unwrap_err();
        assert_eq!(issues[0].path, "city");
        assert!(issues[0].message.contains("string"));
    }

    #[test]
    fn unknown_units_value_is_reported() {
        let issues =
            validate_args(&args(json!({"city": "Berlin", "units": "kelvin"})), Format::Json)
                .unwrap_err();
        assert_eq!(issues[0].path, "units");
        assert!(issues[0].message.contains("Unknown units"));
    }

    #[test]
    fn unknown_mode_value_is_reported() {
        let issues =
            validate_args(&args(json!({"city": "Berlin", "mode": "weekly"})), Format::Json)
                .unwrap_err();
        assert_eq!(issues[0].path, "mode");
    }

    #[test]
    fn unknown_format_value_is_reported() {
        let issues =
            validate_args(&args(json!({"city": "Berlin", "format": "xml"})), Format::Json)
                .unwrap_err();
        assert_eq!(issues[0].path, "format");
    }

    #[test]
    fn days_outside_raw_bound_is_reported() {
        for bad in [0, 17, -3] {
            let issues =
                validate_args(&args(json!({"city": "Berlin", "days": bad})), Format::Json)
                    .unwrap_err();
            assert_eq!(issues[0].path, "days");
            assert!(issues[0].message.contains("between 1 and 16"));
        }
    }

    #[test]
    fn fractional_days_is_reported() {
        let issues = validate_args(&args(json!({"city": "Berlin", "days": 7.5})), Format::Json)
            .unwrap_err();
        assert_eq!(issues[0].path, "days");
        assert!(issues[0].message.contains("integer"));
    }

    #[test]
    fn daily_mode_rejects_short_horizon() {
        let issues = validate_args(
            &args(json!({"city": "Berlin", "mode": "daily", "days": 3})),
            Format::Json,
        )
        .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "days");
        assert!(issues[0].message.contains("7 and 10"));
    }

    #[test]
    fn daily_mode_defaults_to_seven_days() {
        let parsed = validate_args(&args(json!({"city": "Berlin", "mode": "daily"})), Format::Json)
            .expect("valid arguments");
        assert_eq!(parsed.days, None);
        assert_eq!(parsed.mode, Mode::Daily);
    }

    #[test]
    fn non_daily_mode_ignores_days_refinement() {
        // 3 days is fine for hourly mode; the narrow bound only applies to daily.
        let parsed = validate_args(
            &args(json!({"city": "Berlin", "mode": "hourly", "days": 3})),
            Format::Json,
        )
        .expect("valid arguments");
        assert_eq!(parsed.days, Some(3));
    }

    #[test]
    fn daily_refinement_reports_even_with_other_issues() {
        let issues =
            validate_args(&args(json!({"mode": "daily", "days": 3})), Format::Json).unwrap_err();

        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["city", "days"]);
    }

    #[test]
    fn raw_days_issue_is_not_reported_twice() {
        let issues = validate_args(
            &args(json!({"city": "Berlin", "mode": "daily", "days": 20})),
            Format::Json,
        )
        .unwrap_err();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("between 1 and 16"));
    }

    #[test]
    fn multiple_issues_are_collected() {
        let issues = validate_args(
            &args(json!({"city": "", "units": "kelvin", "days": 99})),
            Format::Json,
        )
        .unwrap_err();

        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["city", "units", "days"]);
    }
}
