use tracing_subscriber::{EnvFilter, prelude::*};

use crate::errors::{GatewayError, GatewayResult};

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// Initialize logging based on environment configuration
///
/// Logging stays off unless `RUST_LOG` or `LOG_LEVEL` is set. `RUST_LOG`
/// directives win; `LOG_LEVEL` is the fallback filter. Output goes to stderr
/// because stdout carries the stdio transport and issued tokens.
pub fn init_logging() -> GatewayResult<()> {
    let Some(env_filter) = filter_from(
        std::env::var(ENV_RUST_LOG).ok(),
        std::env::var(ENV_LOG_LEVEL).ok(),
    ) else {
        return Ok(());
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| GatewayError::LoggingInitialization(e.to_string()))?;

    Ok(())
}

fn filter_from(rust_log: Option<String>, log_level: Option<String>) -> Option<EnvFilter> {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| log_level.map(EnvFilter::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_variables_means_no_logging() {
        assert!(filter_from(None, None).is_none());
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        let filter = filter_from(Some("debug".to_string()), Some("error".to_string())).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_log_level_is_the_fallback() {
        let filter = filter_from(None, Some("warn".to_string())).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }
}
