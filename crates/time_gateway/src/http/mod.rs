//! Streamable HTTP gateway.
//!
//! Requests hit, in order: the trace layer, the CORS preflight responder,
//! the fixed `/health` and `/capabilities` routes, and finally the
//! authentication middleware in front of rmcp's streamable HTTP service.
//! The middleware never rejects; tool calls are refused later by
//! [`crate::auth::AuthorizationGate`].

pub mod cors;
pub mod lifecycle;
pub mod middleware;
pub mod origin;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    StreamableHttpServerConfig,
    streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
};

use crate::auth::AuthorizationGate;
use crate::config::{HttpSettings, SecurityConfig};
use crate::core::provider::TimeServer;
use crate::errors::GatewayResult;
use crate::server::TimeService;

pub use cors::CorsPolicy;
pub use lifecycle::{Lifecycle, LifecycleState, shutdown_signal};
pub use middleware::RequestAuthenticator;
pub use routes::{GatewayState, gateway_router};

/// Assembles the full gateway router for an already validated configuration.
pub fn build_router(http: &HttpSettings, security: &SecurityConfig, time_server: TimeServer) -> Router {
    let service = TimeService::new(time_server, AuthorizationGate::new(security.auth_enabled()));
    let tools = service.tools();

    let mcp_service = StreamableHttpService::new(
        move || Ok(service.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: !http.stateless,
            sse_keep_alive: (!http.heartbeat.is_zero()).then_some(http.heartbeat),
            ..Default::default()
        },
    );

    let cors = CorsPolicy::new(security.cors_enabled(), security.allowed_origins().clone());
    let authenticator = RequestAuthenticator::new(security.authority().clone());
    let state = GatewayState::new(cors, tools, &http.path);

    gateway_router(state, authenticator, Router::new().fallback_service(mcp_service))
}

/// Binds, serves until `shutdown` resolves, and drains within the timeout.
pub async fn serve<F>(
    http: &HttpSettings,
    security: &SecurityConfig,
    time_server: TimeServer,
    shutdown: F,
) -> GatewayResult<()>
where
    F: Future<Output = ()> + Send,
{
    let lifecycle = Lifecycle::new(http.timeout);
    let listener = lifecycle.bind(&http.bind_address()).await?;
    tracing::info!(
        path = %http.path,
        auth = security.auth_enabled(),
        cors = security.cors_enabled(),
        stateless = http.stateless,
        "Starting Time MCP HTTP gateway"
    );

    let app = build_router(http, security, time_server);
    lifecycle.run(listener, app, shutdown).await
}

/// Runs the gateway until SIGINT or SIGTERM.
pub async fn run(http: &HttpSettings, security: &SecurityConfig, time_server: TimeServer) -> GatewayResult<()> {
    serve(http, security, time_server, shutdown_signal()).await
}
