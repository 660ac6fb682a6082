//! Environment-driven configuration.
//!
//! [`Config::from_env`] reads every `TIME_*` variable once at startup.
//! Security invariants are checked separately by
//! [`SecurityConfig::validate`] so command-line overrides can be applied
//! first; both run before any listener is bound.

mod env;
pub mod security;

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

pub use security::{SecurityConfig, SecuritySettings, normalize_origins};

use crate::errors::{GatewayError, GatewayResult};

pub const ENV_HTTP_ADDRESS: &str = "TIME_HTTP_ADDRESS";
pub const ENV_HTTP_PATH: &str = "TIME_HTTP_PATH";
pub const ENV_HTTP_STATELESS: &str = "TIME_HTTP_STATELESS";
pub const ENV_HTTP_HEARTBEAT: &str = "TIME_HTTP_HEARTBEAT";
pub const ENV_HTTP_TIMEOUT: &str = "TIME_HTTP_TIMEOUT";
pub const ENV_HTTP_CORS_ENABLED: &str = "TIME_HTTP_CORS_ENABLED";
pub const ENV_HTTP_CORS_ORIGINS: &str = "TIME_HTTP_CORS_ORIGINS";
pub const ENV_AUTH_ENABLED: &str = "TIME_AUTH_ENABLED";
pub const ENV_AUTH_SECRET_KEY: &str = "TIME_AUTH_SECRET_KEY";
pub const ENV_AUTH_ISSUER: &str = "TIME_AUTH_ISSUER";
pub const ENV_AUTH_AUDIENCE: &str = "TIME_AUTH_AUDIENCE";
pub const ENV_AUTH_LEEWAY: &str = "TIME_AUTH_LEEWAY";
pub const ENV_AUTH_TOKEN_TTL: &str = "TIME_AUTH_TOKEN_TTL";
pub const ENV_DEFAULT_TIMEZONE: &str = "TIME_DEFAULT_TIMEZONE";

const DEFAULT_HTTP_ADDRESS: &str = ":8080";
const DEFAULT_HTTP_PATH: &str = "/mcp";
const DEFAULT_HTTP_HEARTBEAT: Duration = Duration::from_secs(30);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_AUTH_ISSUER: &str = "TimeMCP";
pub const DEFAULT_AUTH_AUDIENCE: &str = "TimeMCP-user";
pub const DEFAULT_AUTH_LEEWAY: Duration = Duration::from_secs(60);
/// 31 days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(744 * 3600);

#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// `host:port`; a bare `:port` binds all interfaces.
    pub address: String,
    pub path: String,
    pub stateless: bool,
    /// SSE keep-alive interval; zero disables it.
    pub heartbeat: Duration,
    /// Also used as the shutdown grace period.
    pub timeout: Duration,
}

impl HttpSettings {
    pub fn bind_address(&self) -> String {
        match self.address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.address.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpSettings,
    pub security: SecuritySettings,
    pub default_timezone: Option<Tz>,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http = HttpSettings {
            address: env::string_or(&lookup, ENV_HTTP_ADDRESS, DEFAULT_HTTP_ADDRESS),
            path: env::string_or(&lookup, ENV_HTTP_PATH, DEFAULT_HTTP_PATH),
            stateless: env::bool_or(&lookup, ENV_HTTP_STATELESS, false),
            heartbeat: env::duration_or(&lookup, ENV_HTTP_HEARTBEAT, DEFAULT_HTTP_HEARTBEAT),
            timeout: env::duration_or(&lookup, ENV_HTTP_TIMEOUT, DEFAULT_HTTP_TIMEOUT),
        };

        let security = SecuritySettings {
            auth_enabled: env::bool_or(&lookup, ENV_AUTH_ENABLED, false),
            secret_key: lookup(ENV_AUTH_SECRET_KEY).unwrap_or_default(),
            issuer: env::string_or(&lookup, ENV_AUTH_ISSUER, DEFAULT_AUTH_ISSUER),
            audience: env::string_or(&lookup, ENV_AUTH_AUDIENCE, DEFAULT_AUTH_AUDIENCE),
            leeway: env::duration_or(&lookup, ENV_AUTH_LEEWAY, DEFAULT_AUTH_LEEWAY),
            cors_enabled: env::bool_or(&lookup, ENV_HTTP_CORS_ENABLED, false),
            cors_origins: normalize_origins(&lookup(ENV_HTTP_CORS_ORIGINS).unwrap_or_default()),
        };

        let default_timezone = match lookup(ENV_DEFAULT_TIMEZONE)
            .map(|tz| tz.trim().to_string())
            .filter(|tz| !tz.is_empty())
        {
            Some(name) => {
                let tz = Tz::from_str(&name)
                    .map_err(|_| GatewayError::InvalidTimezone { timezone: name })?;
                tracing::info!("Using default timezone: {}", tz.name());
                Some(tz)
            }
            None => None,
        };

        Ok(Self {
            http,
            security,
            default_timezone,
            token_ttl: env::duration_or(&lookup, ENV_AUTH_TOKEN_TTL, DEFAULT_TOKEN_TTL),
        })
    }
}
