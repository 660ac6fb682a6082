use clap::Parser;
use mcp_server_time_gateway::{cli::Cli, run, utils::logging};

/// Usage: npx @modelcontextprotocol/inspector cargo run --bin mcp-server-time-gateway
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Only emits anything when RUST_LOG or LOG_LEVEL is set
    logging::init_logging()?;

    if let Err(e) = run(cli).await {
        tracing::error!("Error running Time MCP server: {}", e);
        return Err(e.into());
    }

    Ok(())
}
