pub type McpError = rmcp::ErrorData;

/// Result type for startup, configuration and serving operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Type alias for MCP results
pub type McpResult<T> = Result<T, McpError>;

/// Process-level errors. Every variant terminates the run.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("configuration error: {message}")]
    Config { message: String },
    #[error("invalid TIME_DEFAULT_TIMEZONE: {timezone}")]
    InvalidTimezone { timezone: String },
    #[error("failed to bind HTTP listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP listener failed: {0}")]
    Listener(#[from] std::io::Error),
    #[error("stdio transport error: {0}")]
    Stdio(String),
    #[error("token generation failed: {0}")]
    Token(String),
    /// Logging initialization failed
    #[error("Logging initialization failed: {0}")]
    LoggingInitialization(String),
}

impl GatewayError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
