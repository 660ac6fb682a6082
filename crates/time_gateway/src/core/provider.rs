use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::{
    error::{TimeServerError, TimeServerResult},
    models::{TimeConversionResult, TimeResult},
    utils::{self, TIME_INPUT_FORMAT},
};

/// Timezone resolution and conversion.
///
/// Callers that omit a timezone get `default_timezone` when one is configured,
/// otherwise the zone detected from the host.
#[derive(Debug, Clone)]
pub struct TimeServer {
    pub(crate) local_timezone: Tz,
    default_timezone: Option<Tz>,
}

impl TimeServer {
    pub fn new(default_timezone: Option<Tz>) -> Self {
        Self {
            local_timezone: detect_local_timezone(),
            default_timezone,
        }
    }

    /// The zone used when a request names none.
    pub fn fallback_timezone(&self) -> Tz {
        self.default_timezone.unwrap_or(self.local_timezone)
    }

    pub(crate) fn parse_timezone(&self, timezone_name: &str) -> TimeServerResult<Tz> {
        Tz::from_str(timezone_name).map_err(|_| TimeServerError::InvalidTimezone {
            timezone: timezone_name.to_string(),
        })
    }

    fn resolve_timezone(&self, timezone_name: Option<&str>) -> TimeServerResult<(Tz, String)> {
        match timezone_name {
            Some(name) => Ok((self.parse_timezone(name)?, name.to_string())),
            None => {
                let tz = self.fallback_timezone();
                Ok((tz, tz.name().to_string()))
            }
        }
    }

    pub fn get_current_time(&self, timezone_name: Option<&str>) -> TimeServerResult<TimeResult> {
        let (timezone, name) = self.resolve_timezone(timezone_name)?;
        let current_time = Utc::now().with_timezone(&timezone);

        Ok(TimeResult::from_datetime(&current_time, &name))
    }

    pub fn convert_time(
        &self,
        source_tz: Option<&str>,
        time_str: Option<&str>,
        target_tz: &str,
    ) -> TimeServerResult<TimeConversionResult> {
        let (source_timezone, source_name) = self.resolve_timezone(source_tz)?;
        let (target_timezone, target_name) = self.resolve_timezone(Some(target_tz))?;

        let source_time = match time_str {
            Some(time_str) => self.local_time_today(&source_timezone, time_str)?,
            None => Utc::now().with_timezone(&source_timezone),
        };
        let target_time = source_time.with_timezone(&target_timezone);

        Ok(TimeConversionResult {
            source: TimeResult::from_datetime(&source_time, &source_name),
            target: TimeResult::from_datetime(&target_time, &target_name),
            time_difference: utils::calculate_time_difference(&source_time, &target_time),
        })
    }

    /// Interprets `HH:MM` as a wall-clock time on today's date in `timezone`.
    fn local_time_today(&self, timezone: &Tz, time_str: &str) -> TimeServerResult<DateTime<Tz>> {
        let parsed_time = NaiveTime::parse_from_str(time_str, TIME_INPUT_FORMAT).map_err(|_| {
            TimeServerError::InvalidTimeFormat {
                time: time_str.to_string(),
            }
        })?;

        let today = Utc::now().with_timezone(timezone).date_naive();
        timezone
            .from_local_datetime(&today.and_time(parsed_time))
            .single()
            .ok_or_else(|| TimeServerError::AmbiguousTime {
                time: time_str.to_string(),
            })
    }
}

impl Default for TimeServer {
    fn default() -> Self {
        Self::new(None)
    }
}

fn detect_local_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(tz_name) => tz_name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Could not parse timezone '{}', defaulting to UTC", tz_name);
            chrono_tz::UTC
        }),
        Err(e) => {
            tracing::warn!("Could not detect system timezone ({}), defaulting to UTC", e);
            chrono_tz::UTC
        }
    }
}
