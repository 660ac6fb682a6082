use axum::http::request::Parts;
use rmcp::model::{CallToolResult, Content, Extensions};

use crate::auth::outcome::{AuthErrorKind, AuthOutcome, CallerIdentity};

/// Why a tool call was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthDenied {
    #[error("authentication required: {0}")]
    Rejected(AuthErrorKind),
    #[error("authentication required")]
    Unauthenticated,
}

impl AuthDenied {
    pub fn into_tool_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(self.to_string())])
    }
}

/// What the gate lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Local transport, or authentication is switched off.
    Trusted,
    Authenticated(CallerIdentity),
}

impl Admission {
    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            Admission::Trusted => None,
            Admission::Authenticated(identity) => Some(identity),
        }
    }
}

/// Converts the outcome attached by the HTTP middleware into a decision at
/// the moment a tool is invoked.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationGate {
    auth_enabled: bool,
}

impl AuthorizationGate {
    pub fn new(auth_enabled: bool) -> Self {
        Self { auth_enabled }
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    /// Reads the HTTP request parts that rmcp's streamable HTTP transport
    /// places in the request context. Stdio calls carry none.
    pub fn admit(&self, extensions: &Extensions) -> Result<Admission, AuthDenied> {
        match extensions.get::<Parts>() {
            Some(parts) => self.admit_http(parts.extensions.get::<AuthOutcome>()),
            None => Ok(Admission::Trusted),
        }
    }

    pub fn admit_http(&self, outcome: Option<&AuthOutcome>) -> Result<Admission, AuthDenied> {
        if !self.auth_enabled {
            return Ok(Admission::Trusted);
        }
        match outcome {
            Some(AuthOutcome::Authenticated(identity)) => {
                Ok(Admission::Authenticated(identity.clone()))
            }
            Some(AuthOutcome::Rejected(kind)) => Err(AuthDenied::Rejected(*kind)),
            None => Err(AuthDenied::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn identity() -> CallerIdentity {
        CallerIdentity {
            user_id: "1".to_string(),
            username: "alice".to_string(),
            role: "admin".to_string(),
        }
    }

    fn http_extensions(outcome: Option<AuthOutcome>) -> Extensions {
        let (mut parts, _) = Request::builder().uri("/mcp").body(()).unwrap().into_parts();
        if let Some(outcome) = outcome {
            parts.extensions.insert(outcome);
        }
        let mut extensions = Extensions::new();
        extensions.insert(parts);
        extensions
    }

    #[test]
    fn test_stdio_calls_are_trusted() {
        let gate = AuthorizationGate::new(true);
        assert_eq!(gate.admit(&Extensions::new()), Ok(Admission::Trusted));
    }

    #[test]
    fn test_disabled_auth_admits_everything() {
        let gate = AuthorizationGate::new(false);
        let extensions =
            http_extensions(Some(AuthOutcome::Rejected(AuthErrorKind::InvalidToken)));
        assert_eq!(gate.admit(&extensions), Ok(Admission::Trusted));
    }

    #[test]
    fn test_rejected_outcome_names_the_error_kind() {
        let gate = AuthorizationGate::new(true);
        let extensions =
            http_extensions(Some(AuthOutcome::Rejected(AuthErrorKind::ExpiredToken)));

        let denied = gate.admit(&extensions).unwrap_err();
        assert_eq!(denied.to_string(), "authentication required: expired_token");

        let result = denied.into_tool_result();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_missing_outcome_is_generic_denial() {
        let gate = AuthorizationGate::new(true);
        let denied = gate.admit(&http_extensions(None)).unwrap_err();
        assert_eq!(denied, AuthDenied::Unauthenticated);
        assert_eq!(denied.to_string(), "authentication required");
    }

    #[test]
    fn test_authenticated_caller_is_exposed() {
        let gate = AuthorizationGate::new(true);
        let extensions = http_extensions(Some(AuthOutcome::Authenticated(identity())));

        let admission = gate.admit(&extensions).unwrap();
        assert_eq!(admission.identity(), Some(&identity()));
    }
}
