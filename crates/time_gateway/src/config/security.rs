//! Startup-time validation of the authentication and cross-origin settings.

use std::collections::HashSet;
use std::time::Duration;

use derive_getters::Getters;
use url::Url;

use crate::auth::TokenAuthority;
use crate::errors::{GatewayError, GatewayResult};

pub const UNIVERSAL_ORIGIN: &str = "*";
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Security settings as loaded from the environment, before validation.
#[derive(Clone, Default)]
pub struct SecuritySettings {
    pub auth_enabled: bool,
    pub secret_key: String,
    pub issuer: String,
    pub audience: String,
    pub leeway: Duration,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("auth_enabled", &self.auth_enabled)
            .field("secret_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .field("cors_enabled", &self.cors_enabled)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// Validated, immutable security configuration shared by every request.
#[derive(Debug, Clone, Getters)]
pub struct SecurityConfig {
    /// Present exactly when authentication is enabled.
    authority: Option<TokenAuthority>,
    #[getter(skip)]
    cors_enabled: bool,
    allowed_origins: Vec<String>,
}

impl SecurityConfig {
    pub fn validate(settings: &SecuritySettings) -> GatewayResult<Self> {
        let authority = if settings.auth_enabled {
            if settings.secret_key.is_empty() {
                return Err(GatewayError::config(
                    "TIME_AUTH_SECRET_KEY is required when TIME_AUTH_ENABLED=true",
                ));
            }
            if settings.secret_key.len() < RECOMMENDED_SECRET_LEN {
                tracing::warn!(
                    "TIME_AUTH_SECRET_KEY should be at least {} characters for security",
                    RECOMMENDED_SECRET_LEN
                );
            }
            Some(TokenAuthority::new(
                settings.secret_key.as_bytes(),
                settings.issuer.clone(),
                settings.audience.clone(),
                settings.leeway,
            ))
        } else {
            None
        };

        if settings.auth_enabled
            && settings.cors_enabled
            && settings.cors_origins.iter().any(|o| o == UNIVERSAL_ORIGIN)
        {
            return Err(GatewayError::config(
                "insecure CORS: TIME_HTTP_CORS_ORIGINS contains \"*\" while TIME_AUTH_ENABLED=true",
            ));
        }

        Ok(Self {
            authority,
            cors_enabled: settings.cors_enabled,
            allowed_origins: settings.cors_origins.clone(),
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.authority.is_some()
    }

    pub fn cors_enabled(&self) -> bool {
        self.cors_enabled
    }
}

/// Splits a comma-separated allow-list, trims and deduplicates it, and
/// reduces full URLs to `host[:port]`. `*` and `*.domain` are kept verbatim.
pub fn normalize_origins(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut origins = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let origin = if entry.contains("://") {
            match Url::parse(entry).ok().and_then(|url| host_with_port(&url)) {
                Some(host) => host,
                None => {
                    tracing::warn!("Invalid CORS origin URL: {:?} (skipping)", entry);
                    continue;
                }
            }
        } else {
            entry.to_string()
        };

        if seen.insert(origin.clone()) {
            origins.push(origin);
        }
    }
    origins
}

pub(crate) fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
