use rmcp::ErrorData as McpError;
use rmcp::serde_json::json;

const ERROR_INVALID_TIMEZONE: &str = "invalid_timezone";
const ERROR_INVALID_TIME_FORMAT: &str = "invalid_time_format";
const ERROR_AMBIGUOUS_TIME: &str = "ambiguous_time";

/// Failures of the two time tools. These become protocol-level errors and
/// never terminate the server.
#[derive(Debug, thiserror::Error)]
pub enum TimeServerError {
    #[error("Invalid timezone: {timezone}")]
    InvalidTimezone { timezone: String },
    #[error("Invalid time format: {time}. Expected HH:MM format")]
    InvalidTimeFormat { time: String },
    #[error("Ambiguous or nonexistent local time during DST transition: {time}")]
    AmbiguousTime { time: String },
}

impl From<TimeServerError> for McpError {
    fn from(err: TimeServerError) -> Self {
        match err {
            TimeServerError::InvalidTimezone { timezone } => McpError::invalid_params(
                ERROR_INVALID_TIMEZONE,
                Some(json!({"timezone": timezone})),
            ),
            TimeServerError::InvalidTimeFormat { time } => {
                McpError::invalid_params(ERROR_INVALID_TIME_FORMAT, Some(json!({"time": time})))
            }
            TimeServerError::AmbiguousTime { time } => {
                McpError::invalid_params(ERROR_AMBIGUOUS_TIME, Some(json!({"time": time})))
            }
        }
    }
}

pub type TimeServerResult<T> = Result<T, TimeServerError>;
