//! Time MCP server with an authenticated streamable HTTP gateway.
//!
//! Over stdio the two time tools are served directly. Over HTTP every
//! request is authenticated by middleware that only records its verdict;
//! tool calls are refused at invocation time when that verdict is not a
//! valid caller.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod http;
pub mod server;
pub mod utils;

use crate::auth::AuthorizationGate;
use crate::cli::{Cli, Transport};
use crate::config::{Config, SecurityConfig};
use crate::core::provider::TimeServer;
use crate::errors::GatewayResult;
use crate::server::TimeService;

/// Runs whichever mode the command line selects.
///
/// Configuration is loaded and validated before any listener is bound.
pub async fn run(cli: Cli) -> GatewayResult<()> {
    let mut config = Config::from_env()?;

    if cli.generate_token {
        let issued = cli::token::generate_token(&cli, &config)?;
        println!("{}", issued.token);
        eprintln!("{}", cli::token::describe(&issued));
        return Ok(());
    }

    if cli.auth_enabled {
        config.security.auth_enabled = true;
    }
    let security = SecurityConfig::validate(&config.security)?;
    let time_server = TimeServer::new(config.default_timezone);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("Starting Time MCP server on stdio");
            let gate = AuthorizationGate::new(security.auth_enabled());
            server::run_stdio(TimeService::new(time_server, gate)).await
        }
        Transport::Http => http::run(&config.http, &security, time_server).await,
    }
}
