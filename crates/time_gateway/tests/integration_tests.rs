use assert_cmd::Command;
use predicates::prelude::*;

const BIN: &str = "mcp-server-time-gateway";
const SECRET: &str = "integration-secret-0123456789abcdef";

/// A command with no inherited gateway configuration.
fn gateway() -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    for key in [
        "TIME_HTTP_ADDRESS",
        "TIME_HTTP_PATH",
        "TIME_HTTP_STATELESS",
        "TIME_HTTP_HEARTBEAT",
        "TIME_HTTP_TIMEOUT",
        "TIME_HTTP_CORS_ENABLED",
        "TIME_HTTP_CORS_ORIGINS",
        "TIME_AUTH_ENABLED",
        "TIME_AUTH_SECRET_KEY",
        "TIME_AUTH_ISSUER",
        "TIME_AUTH_AUDIENCE",
        "TIME_AUTH_LEEWAY",
        "TIME_AUTH_TOKEN_TTL",
        "TIME_DEFAULT_TIMEZONE",
        "RUST_LOG",
        "LOG_LEVEL",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// Test CLI help output
#[test]
fn test_cli_help() {
    gateway()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--transport"))
        .stdout(predicate::str::contains("--generate-token"));
}

/// Test CLI version output
#[test]
fn test_cli_version() {
    gateway()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_transport_is_rejected() {
    gateway().args(["--transport", "grpc"]).assert().failure();
}

#[test]
fn test_generate_token_requires_secret() {
    gateway()
        .arg("--generate-token")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("TIME_AUTH_SECRET_KEY"));
}

#[test]
fn test_generate_token_prints_token_on_stdout() {
    let output = gateway()
        .env("TIME_AUTH_SECRET_KEY", SECRET)
        .args([
            "--generate-token",
            "--token-user-id",
            "7",
            "--token-username",
            "dora",
            "--token-role",
            "viewer",
            "--token-expiration",
            "1",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("dora"))
        .stderr(predicate::str::contains("viewer"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let token = stdout.trim();
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_auth_with_wildcard_origin_fails_before_binding() {
    gateway()
        .env("TIME_AUTH_SECRET_KEY", SECRET)
        .env("TIME_HTTP_CORS_ENABLED", "true")
        .env("TIME_HTTP_CORS_ORIGINS", "https://app.example.com,*")
        .env("TIME_HTTP_ADDRESS", "127.0.0.1:0")
        .args(["--transport", "http", "--auth-enabled"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("insecure CORS"));
}

#[test]
fn test_auth_without_secret_fails() {
    gateway()
        .env("TIME_AUTH_ENABLED", "true")
        .env("TIME_HTTP_ADDRESS", "127.0.0.1:0")
        .args(["--transport", "http"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("TIME_AUTH_SECRET_KEY"));
}

#[test]
fn test_invalid_default_timezone_fails() {
    gateway()
        .env("TIME_DEFAULT_TIMEZONE", "Mars/Olympus_Mons")
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mars/Olympus_Mons"));
}
