use chrono::{DateTime, TimeZone};
use chrono_tz::OffsetComponents;
use rmcp::schemars;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::utils::{DATETIME_FORMAT, DAY_FORMAT};

fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// Trims the value and maps blank input to `None`.
fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Time result containing timezone information
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TimeResult {
    /// IANA timezone name
    pub timezone: String,
    /// ISO 8601 datetime string
    pub datetime: String,
    /// Day of the week
    pub day_of_week: String,
    /// Whether daylight saving time is active
    pub is_dst: bool,
}

impl TimeResult {
    pub fn from_datetime<Tz>(dt: &DateTime<Tz>, timezone_name: &str) -> TimeResult
    where
        Tz: TimeZone,
        Tz::Offset: OffsetComponents + std::fmt::Display,
    {
        TimeResult {
            timezone: timezone_name.to_string(),
            datetime: dt.format(DATETIME_FORMAT).to_string(),
            day_of_week: dt.format(DAY_FORMAT).to_string(),
            is_dst: dt.offset().dst_offset().num_seconds() != 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TimeConversionResult {
    pub source: TimeResult,
    pub target: TimeResult,
    /// Offset of the target zone relative to the source zone, e.g. `+5.5h`
    pub time_difference: String,
}

/// Request to get current time in a timezone
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetCurrentTimeRequest {
    /// The timezone to get the current time in (IANA name, e.g. 'America/New_York').
    /// If not provided, the server default or system timezone is used.
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub timezone: Option<String>,
}

/// Request to convert time between timezones
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertTimeRequest {
    /// Source timezone. Defaults to the server default or system timezone if not provided.
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub source_timezone: Option<String>,
    /// Time in 24-hour format (HH:MM). Defaults to the current time if not provided.
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub time: Option<String>,
    /// Target timezone to convert the time to.
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    pub target_timezone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_result_serialization() {
        let time_result = TimeResult {
            timezone: "UTC".to_string(),
            datetime: "2024-01-01T12:00:00+00:00".to_string(),
            day_of_week: "Monday".to_string(),
            is_dst: false,
        };

        let json = serde_json::to_string(&time_result).unwrap();
        assert!(json.contains("UTC"));
        assert!(json.contains("Monday"));
    }

    #[test]
    fn test_timezone_trimming() {
        let json = r#"{"timezone": "   Africa/Cairo   "}"#;
        let request: GetCurrentTimeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.timezone.as_deref(), Some("Africa/Cairo"));

        let json = r#"{
            "source_timezone": "  America/New_York  ",
            "time": "  14:30  ",
            "target_timezone": "   Europe/London   "
        }"#;
        let request: ConvertTimeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.source_timezone.as_deref(), Some("America/New_York"));
        assert_eq!(request.time.as_deref(), Some("14:30"));
        assert_eq!(request.target_timezone, "Europe/London");
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let request: GetCurrentTimeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.timezone.is_none());

        let request: GetCurrentTimeRequest =
            serde_json::from_str(r#"{"timezone": "   "}"#).unwrap();
        assert!(request.timezone.is_none());

        let request: ConvertTimeRequest =
            serde_json::from_str(r#"{"target_timezone": "Asia/Tokyo", "time": ""}"#).unwrap();
        assert!(request.source_timezone.is_none());
        assert!(request.time.is_none());
    }

    #[test]
    fn test_target_timezone_is_required() {
        let result: Result<ConvertTimeRequest, _> =
            serde_json::from_str(r#"{"source_timezone": "UTC"}"#);
        assert!(result.is_err());
    }
}
