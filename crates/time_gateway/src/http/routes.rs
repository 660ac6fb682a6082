use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use rmcp::model::Tool;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::http::{
    cors::{CorsPolicy, preflight},
    middleware::{RequestAuthenticator, authenticate},
};

pub const SERVICE_NAME: &str = "TimeMCP";

/// State shared by the fixed endpoints.
#[derive(Debug, Clone)]
pub struct GatewayState {
    cors: CorsPolicy,
    tools: Arc<Vec<Tool>>,
    mcp_path: Arc<str>,
}

impl GatewayState {
    pub fn new(cors: CorsPolicy, tools: Vec<Tool>, mcp_path: &str) -> Self {
        Self {
            cors,
            tools: Arc::new(tools),
            mcp_path: mcp_path.into(),
        }
    }
}

/// `/health` and `/capabilities` are served directly. Every other path goes
/// to `protected`, behind the authentication middleware. Preflights from
/// allowed origins are answered before routing.
pub fn gateway_router(
    state: GatewayState,
    authenticator: RequestAuthenticator,
    protected: Router,
) -> Router {
    let cors = state.cors.clone();
    let protected =
        protected.layer(middleware::from_fn_with_state(authenticator, authenticate));

    Router::new()
        .route("/health", get(health))
        .route("/capabilities", get(capabilities))
        .fallback_service(protected)
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors, preflight))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let body = json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    });
    json_response(&state, &headers, body, "no-cache")
}

async fn capabilities(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let body = json!({
        "endpoint": &*state.mcp_path,
        "tools": &*state.tools,
    });
    json_response(&state, &headers, body, "public, max-age=3600")
}

fn json_response(
    state: &GatewayState,
    request_headers: &HeaderMap,
    body: serde_json::Value,
    cache_control: &'static str,
) -> Response {
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    state.cors.apply(request_headers, response.headers_mut());
    response
}
