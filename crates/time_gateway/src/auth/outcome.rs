use std::fmt;

use crate::auth::{claims::Claims, token::CredentialError};

/// Reason a request carries no usable credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingToken => "missing_token",
            AuthErrorKind::InvalidToken => "invalid_token",
            AuthErrorKind::ExpiredToken => "expired_token",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

/// Result of authenticating one HTTP request.
///
/// Stored in the request extensions by the authentication middleware and
/// read by the tool-call gate. It is never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(CallerIdentity),
    Rejected(AuthErrorKind),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            AuthOutcome::Authenticated(identity) => Some(identity),
            AuthOutcome::Rejected(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<AuthErrorKind> {
        match self {
            AuthOutcome::Authenticated(_) => None,
            AuthOutcome::Rejected(kind) => Some(*kind),
        }
    }
}

impl From<Result<Claims, CredentialError>> for AuthOutcome {
    fn from(result: Result<Claims, CredentialError>) -> Self {
        match result {
            Ok(claims) => AuthOutcome::Authenticated(claims.identity()),
            Err(CredentialError::Expired) => AuthOutcome::Rejected(AuthErrorKind::ExpiredToken),
            Err(_) => AuthOutcome::Rejected(AuthErrorKind::InvalidToken),
        }
    }
}
