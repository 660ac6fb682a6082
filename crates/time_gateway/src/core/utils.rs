use chrono::{DateTime, Offset};
use chrono_tz::Tz;

pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
pub const TIME_INPUT_FORMAT: &str = "%H:%M";
pub const DAY_FORMAT: &str = "%A";

/// Render an hour delta as `+5h`, `-3h`, `+5.75h`.
pub fn format_time_difference(hours_difference: f64) -> String {
    if hours_difference.fract() == 0.0 {
        return format!("{:+.0}h", hours_difference);
    }
    let formatted = format!("{:+.2}", hours_difference);
    format!("{}h", formatted.trim_end_matches('0').trim_end_matches('.'))
}

/// Offset of `target_time` relative to `source_time`, DST included.
pub fn calculate_time_difference(source_time: &DateTime<Tz>, target_time: &DateTime<Tz>) -> String {
    let source_offset = source_time.offset().fix().local_minus_utc();
    let target_offset = target_time.offset().fix().local_minus_utc();
    format_time_difference(f64::from(target_offset - source_offset) / 3600.0)
}
