//! Lenient readers for `TIME_*` variables.
//!
//! Malformed booleans and durations fall back to the default with a warning;
//! only the security invariants and the default timezone are hard failures.

use std::time::Duration;

pub(crate) fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|value| !value.is_empty()) else {
        return default;
    };
    match parse_bool(&raw) {
        Some(value) => value,
        None => {
            tracing::warn!(
                "Invalid boolean value for {}: {:?}. Using default: {}",
                key,
                raw,
                default
            );
            default
        }
    }
}

pub(crate) fn duration_or<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|value| !value.is_empty()) else {
        return default;
    };
    match humantime::parse_duration(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "Invalid duration value for {}: {:?} ({}). Using default: {}",
                key,
                raw,
                e,
                humantime::format_duration(default)
            );
            default
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
