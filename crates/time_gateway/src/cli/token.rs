use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::{IssuedToken, TokenAuthority};
use crate::cli::Cli;
use crate::config::Config;
use crate::errors::{GatewayError, GatewayResult};

/// Issues a token from the command-line claims and the configured key.
///
/// Fails without touching the network when no signing key is configured.
pub fn generate_token(cli: &Cli, config: &Config) -> GatewayResult<IssuedToken> {
    let security = &config.security;
    if security.secret_key.is_empty() {
        return Err(GatewayError::config(
            "TIME_AUTH_SECRET_KEY must be set to generate a token",
        ));
    }

    let ttl = token_ttl(cli.token_expiration, config)?;
    let authority = TokenAuthority::new(
        security.secret_key.as_bytes(),
        &security.issuer,
        &security.audience,
        security.leeway,
    );

    authority
        .issue(&cli.token_user_id, &cli.token_username, &cli.token_role, ttl)
        .map_err(|e| GatewayError::Token(e.to_string()))
}

fn token_ttl(hours: Option<i64>, config: &Config) -> GatewayResult<TimeDelta> {
    match hours {
        Some(hours) => TimeDelta::try_hours(hours)
            .ok_or_else(|| GatewayError::config(format!("token expiration out of range: {}h", hours))),
        None if config.token_ttl.is_zero() => {
            Err(GatewayError::config("TIME_AUTH_TOKEN_TTL must be greater than zero"))
        }
        None => TimeDelta::from_std(config.token_ttl)
            .map_err(|_| GatewayError::config("TIME_AUTH_TOKEN_TTL is out of range")),
    }
}

/// Human-readable summary of an issued token, written to stderr.
pub fn describe(issued: &IssuedToken) -> String {
    let claims = &issued.claims;
    let expires = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| claims.exp.to_string());
    format!(
        "Token generated\n  user_id:  {}\n  username: {}\n  role:     {}\n  issuer:   {}\n  audience: {}\n  expires:  {}",
        claims.user_id,
        claims.username,
        claims.role,
        claims.iss,
        claims.aud,
        expires
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::auth::CredentialError;

    const SECRET: &str = "cli-token-secret-0123456789abcdef";

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned()).unwrap()
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mcp-server-time-gateway", "--generate-token"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let err = generate_token(&cli(&[]), &config_with(&[])).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn test_generated_token_validates_under_configured_authority() {
        let config = config_with(&[("TIME_AUTH_SECRET_KEY", SECRET)]);
        let issued = generate_token(
            &cli(&["--token-user-id", "42", "--token-username", "carol", "--token-role", "ops"]),
            &config,
        )
        .unwrap();

        let authority = TokenAuthority::new(
            SECRET.as_bytes(),
            "TimeMCP",
            "TimeMCP-user",
            Duration::from_secs(60),
        );
        let claims = authority.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id, "42");
        assert_eq!(claims.username, "carol");
        assert_eq!(claims.role, "ops");
    }

    #[test]
    fn test_default_lifetime_comes_from_config() {
        let config = config_with(&[
            ("TIME_AUTH_SECRET_KEY", SECRET),
            ("TIME_AUTH_TOKEN_TTL", "2h"),
        ]);
        let issued = generate_token(&cli(&[]), &config).unwrap();
        let lifetime = issued.claims.exp - issued.claims.iat.unwrap();
        assert_eq!(lifetime, 2 * 3600);
    }

    #[test]
    fn test_negative_expiration_issues_expired_token() {
        let config = config_with(&[("TIME_AUTH_SECRET_KEY", SECRET)]);
        let issued = generate_token(&cli(&["--token-expiration", "-1"]), &config).unwrap();

        let authority = TokenAuthority::new(
            SECRET.as_bytes(),
            "TimeMCP",
            "TimeMCP-user",
            Duration::from_secs(60),
        );
        assert_eq!(authority.validate(&issued.token), Err(CredentialError::Expired));
    }

    #[test]
    fn test_zero_configured_ttl_is_rejected() {
        let config = config_with(&[
            ("TIME_AUTH_SECRET_KEY", SECRET),
            ("TIME_AUTH_TOKEN_TTL", "0s"),
        ]);
        assert!(matches!(
            generate_token(&cli(&[]), &config),
            Err(GatewayError::Config { .. })
        ));
    }

    #[test]
    fn test_describe_lists_claims() {
        let config = config_with(&[("TIME_AUTH_SECRET_KEY", SECRET)]);
        let issued = generate_token(&cli(&[]), &config).unwrap();
        let summary = describe(&issued);
        assert!(summary.contains("user1"));
        assert!(summary.contains("TimeMCP-user"));
        assert!(!summary.contains(&issued.token));
    }
}
