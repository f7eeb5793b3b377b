//! Common types used throughout the SDK
//!
//! Shared type aliases and the small enumerations accepted by report
//! endpoints. Each enumeration parses from the string the API expects and
//! rejects anything else with a validation error naming the parameter.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Export Format
// ============================================================================

/// File format of an exported report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated values with a header row (default)
    #[default]
    Csv,
    /// JSON array of record objects
    Json,
}

impl ExportFormat {
    /// Value sent in the `format` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::validation("format", format!("'{other}'"))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Sort Direction
// ============================================================================

/// Direction of a `sort[<field>]` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Uppercase wire value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    /// Case-insensitive: `asc`, `Asc` and `ASC` are all accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(Error::validation(
                "sort",
                format!("invalid direction: '{other}'"),
            )),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Timestamp breakdown
// ============================================================================

/// Time bucket used to break down actuals reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timestamp {
    Hour,
    Datehour,
    Date,
    Week,
    Month,
}

impl Timestamp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Datehour => "datehour",
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hour" => Ok(Self::Hour),
            "datehour" => Ok(Self::Datehour),
            "date" => Ok(Self::Date),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(Error::validation("timestamp", format!("'{other}'"))),
        }
    }
}

// ============================================================================
// Cohort parameters
// ============================================================================

/// Whether a cohort report is anchored on clicks or installs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CohortType {
    Click,
    Install,
}

impl CohortType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Install => "install",
        }
    }
}

impl FromStr for CohortType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "click" => Ok(Self::Click),
            "install" => Ok(Self::Install),
            other => Err(Error::validation("cohort_type", format!("'{other}'"))),
        }
    }
}

/// Rollup applied to cohort values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Incremental,
    Cumulative,
}

impl AggregationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::Cumulative => "cumulative",
        }
    }
}

impl FromStr for AggregationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "incremental" => Ok(Self::Incremental),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(Error::validation(
                "aggregation_type",
                format!("'{other}'"),
            )),
        }
    }
}

/// Bucket size of a cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortInterval {
    YearDay,
    YearWeek,
    YearMonth,
    Year,
}

impl CohortInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::YearDay => "year_day",
            Self::YearWeek => "year_week",
            Self::YearMonth => "year_month",
            Self::Year => "year",
        }
    }
}

impl FromStr for CohortInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "year_day" => Ok(Self::YearDay),
            "year_week" => Ok(Self::YearWeek),
            "year_month" => Ok(Self::YearMonth),
            "year" => Ok(Self::Year),
            other => Err(Error::validation(
                "cohort_interval",
                format!("'{other}'"),
            )),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff between retries and polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay
    #[default]
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    Exponential,
}

impl BackoffType {
    /// Delay for the given zero-based attempt, capped at `max`
    pub fn delay(
        self,
        initial: std::time::Duration,
        max: std::time::Duration,
        attempt: u32,
    ) -> std::time::Duration {
        let delay = match self {
            Self::Constant => initial,
            Self::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            Self::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        std::cmp::min(delay, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_export_format_parse() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }

    #[test]
    fn test_sort_direction_case_insensitive() {
        for input in ["asc", "ASC", "Asc"] {
            assert_eq!(input.parse::<SortDirection>().unwrap(), SortDirection::Asc);
        }
        for input in ["desc", "DESC", "dEsC"] {
            assert_eq!(input.parse::<SortDirection>().unwrap(), SortDirection::Desc);
        }
        let err = "up".parse::<SortDirection>().unwrap_err();
        assert!(err.to_string().contains("'UP'"));
    }

    #[test]
    fn test_cohort_enums() {
        assert_eq!("click".parse::<CohortType>().unwrap(), CohortType::Click);
        assert!("view".parse::<CohortType>().is_err());
        assert_eq!(
            "cumulative".parse::<AggregationType>().unwrap(),
            AggregationType::Cumulative
        );
        assert!("total".parse::<AggregationType>().is_err());
        assert_eq!(
            "year_month".parse::<CohortInterval>().unwrap().as_str(),
            "year_month"
        );
        assert!("decade".parse::<CohortInterval>().is_err());
    }

    #[test]
    fn test_timestamp_parse() {
        assert_eq!("datehour".parse::<Timestamp>().unwrap(), Timestamp::Datehour);
        let err = "minute".parse::<Timestamp>().unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'timestamp' is invalid: 'minute'");
    }

    #[test]
    fn test_backoff_delay() {
        let initial = Duration::from_secs(1);
        let max = Duration::from_secs(10);
        assert_eq!(BackoffType::Constant.delay(initial, max, 5), initial);
        assert_eq!(
            BackoffType::Linear.delay(initial, max, 2),
            Duration::from_secs(3)
        );
        assert_eq!(
            BackoffType::Exponential.delay(initial, max, 3),
            Duration::from_secs(8)
        );
        assert_eq!(BackoffType::Exponential.delay(initial, max, 10), max);
    }

    #[test]
    fn test_export_format_serde() {
        let format: ExportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, ExportFormat::Json);
        assert_eq!(serde_json::to_string(&ExportFormat::Csv).unwrap(), "\"csv\"");
    }
}
