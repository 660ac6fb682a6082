//! Request authentication.
//!
//! The middleware never rejects a request. It records an [`AuthOutcome`] in
//! the request extensions and always hands the request on; whether the
//! outcome matters is decided when a tool is actually invoked.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthErrorKind, AuthOutcome, TokenAuthority};

#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    authority: Option<Arc<TokenAuthority>>,
}

impl RequestAuthenticator {
    /// `None` disables authentication.
    pub fn new(authority: Option<TokenAuthority>) -> Self {
        Self {
            authority: authority.map(Arc::new),
        }
    }

    pub fn disabled() -> Self {
        Self { authority: None }
    }

    /// `None` when authentication is disabled.
    pub fn outcome_for(&self, headers: &HeaderMap) -> Option<AuthOutcome> {
        let authority = self.authority.as_ref()?;
        let outcome = match bearer_token(headers) {
            Some(token) => AuthOutcome::from(authority.validate(token).inspect_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
            })),
            None => AuthOutcome::Rejected(AuthErrorKind::MissingToken),
        };
        Some(outcome)
    }
}

/// The credential of an `Authorization: Bearer <token>` header. The header
/// must hold exactly two whitespace-separated parts; the scheme is matched
/// case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    let (scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    Some(token)
}

pub async fn authenticate(
    State(authenticator): State<RequestAuthenticator>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(outcome) = authenticator.outcome_for(request.headers()) {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        match &outcome {
            AuthOutcome::Authenticated(identity) => tracing::info!(
                "Authenticated user {} ({}) from {}",
                identity.username,
                identity.role,
                peer
            ),
            AuthOutcome::Rejected(kind) => {
                tracing::info!("Unauthenticated request from {}: {}", peer, kind)
            }
        }
        request.extensions_mut().insert(outcome);
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;
    use chrono::TimeDelta;

    use super::*;

    const SECRET: &[u8] = b"middleware-test-secret-0123456789abcdef";

    fn authority() -> TokenAuthority {
        TokenAuthority::new(SECRET, "TimeMCP", "TimeMCP-user", Duration::from_secs(60))
    }

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("BEARER   abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer a b")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_disabled_authentication_attaches_nothing() {
        let authenticator = RequestAuthenticator::disabled();
        assert!(authenticator.outcome_for(&headers("Bearer x")).is_none());
        assert!(authenticator.outcome_for(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_outcomes() {
        let authority = authority();
        let valid = authority
            .issue("1", "testuser", "user", TimeDelta::hours(1))
            .unwrap()
            .token;
        let expired = authority
            .issue("1", "testuser", "user", TimeDelta::hours(-1))
            .unwrap()
            .token;
        let foreign = TokenAuthority::new(
            b"different-secret-different-secret",
            "TimeMCP",
            "TimeMCP-user",
            Duration::from_secs(60),
        )
        .issue("1", "testuser", "user", TimeDelta::hours(1))
        .unwrap()
        .token;

        let authenticator = RequestAuthenticator::new(Some(authority));
        let outcome = |value: Option<String>| {
            let headers = value.map(|v| headers(&v)).unwrap_or_default();
            authenticator.outcome_for(&headers).unwrap()
        };

        let authenticated = outcome(Some(format!("Bearer {}", valid)));
        assert_eq!(authenticated.identity().map(|i| i.user_id.as_str()), Some("1"));

        assert_eq!(
            outcome(Some(format!("Bearer {}", foreign))),
            AuthOutcome::Rejected(AuthErrorKind::InvalidToken)
        );
        assert_eq!(
            outcome(Some(format!("Bearer {}", expired))),
            AuthOutcome::Rejected(AuthErrorKind::ExpiredToken)
        );
        assert_eq!(
            outcome(None),
            AuthOutcome::Rejected(AuthErrorKind::MissingToken)
        );
        assert_eq!(
            outcome(Some(format!("Bearer{}", valid))),
            AuthOutcome::Rejected(AuthErrorKind::MissingToken)
        );
    }
}
