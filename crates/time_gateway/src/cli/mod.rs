pub mod token;

use clap::{Parser, ValueEnum};

/// Time MCP Gateway
///
/// Timezone tools served over stdio, or over streamable HTTP behind bearer
/// token authentication and an origin allow-list.
///
/// ## Development
/// ```bash
/// npx @modelcontextprotocol/inspector cargo run --bin mcp-server-time-gateway
/// ```
///
/// ## Environment Variables
/// - `TIME_HTTP_*`: listener address, endpoint path, timeouts and CORS
/// - `TIME_AUTH_*`: signing key, issuer, audience, leeway and token lifetime
/// - `TIME_DEFAULT_TIMEZONE`: zone used when a request names none
/// - `RUST_LOG` / `LOG_LEVEL`: logging verbosity (logs go to stderr)
#[derive(Parser, Debug, Clone)]
#[command(name = "mcp-server-time-gateway")]
#[command(about = "A timezone MCP server with an authenticated HTTP gateway")]
#[command(version)]
pub struct Cli {
    /// Transport to serve the MCP protocol on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Require bearer tokens for tool calls over HTTP, overriding TIME_AUTH_ENABLED
    #[arg(long)]
    pub auth_enabled: bool,

    /// Print a signed token to stdout and exit
    #[arg(long)]
    pub generate_token: bool,

    /// `user_id` claim of the generated token
    #[arg(long, default_value = "user1", value_name = "ID")]
    pub token_user_id: String,

    /// `username` claim of the generated token
    #[arg(long, default_value = "admin", value_name = "NAME")]
    pub token_username: String,

    /// `role` claim of the generated token
    #[arg(long, default_value = "admin", value_name = "ROLE")]
    pub token_role: String,

    /// Lifetime of the generated token in hours [default: TIME_AUTH_TOKEN_TTL]
    #[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
    pub token_expiration: Option<i64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}
