use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::origin::is_origin_allowed;

const ENDPOINT_METHODS: &str = "GET, OPTIONS";
const PREFLIGHT_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Cross-origin header policy backed by the origin allow-list.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    enabled: bool,
    allowed_origins: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new(enabled: bool, allowed_origins: Vec<String>) -> Self {
        Self {
            enabled,
            allowed_origins: allowed_origins.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, Vec::new())
    }

    /// The request's `Origin` header, when cross-origin access is enabled and
    /// the origin is on the allow-list.
    pub fn allowed_origin<'a>(&self, request_headers: &'a HeaderMap) -> Option<&'a HeaderValue> {
        if !self.enabled {
            return None;
        }
        let origin = request_headers.get(header::ORIGIN)?;
        let allowed = origin
            .to_str()
            .is_ok_and(|value| is_origin_allowed(value, &self.allowed_origins));
        if allowed {
            tracing::debug!("CORS: origin {:?} is allowed", origin);
            Some(origin)
        } else {
            tracing::debug!("CORS: origin {:?} is not allowed", origin);
            None
        }
    }

    /// Adds cross-origin headers for the fixed GET endpoints.
    pub fn apply(&self, request_headers: &HeaderMap, response_headers: &mut HeaderMap) {
        if let Some(origin) = self.allowed_origin(request_headers) {
            insert_origin_headers(response_headers, origin.clone(), ENDPOINT_METHODS);
        }
    }

    /// A complete preflight response, or `None` to let the request fall
    /// through to the regular handlers.
    pub fn preflight(&self, request_headers: &HeaderMap) -> Option<Response> {
        let origin = self.allowed_origin(request_headers)?.clone();
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        insert_origin_headers(headers, origin, PREFLIGHT_METHODS);
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        Some(response)
    }
}

fn insert_origin_headers(headers: &mut HeaderMap, origin: HeaderValue, methods: &'static str) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(methods),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// Answers `OPTIONS` preflights from allowed origins on any path.
pub async fn preflight(State(cors): State<CorsPolicy>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        if let Some(response) = cors.preflight(request.headers()) {
            return response;
        }
    }
    next.run(request).await
}
