//! HS256 bearer tokens: issuing and validation.
//!
//! Only [`TOKEN_ALGORITHM`] is ever accepted. Validation runs in a fixed order
//! so callers can tell the failures apart:
//!
//! 1. header algorithm and HMAC signature
//! 2. `iss`, `aud` and `nbf` (with leeway)
//! 3. `exp` (with leeway), reported as [`CredentialError::Expired`]
//! 4. non-empty `user_id`, `username` and `role`

use std::fmt;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use crate::auth::claims::{Audience, Claims};

pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token has expired")]
    Expired,
    #[error("token is missing required claims: {}", .0.join(", "))]
    MissingClaims(Vec<&'static str>),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Issues and validates tokens for one issuer/audience pair under one
/// shared secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    leeway: Duration,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("TokenAuthority")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        leeway: Duration,
    ) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.algorithms = vec![TOKEN_ALGORITHM];
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        // Expiry is checked after iss/aud so an expired token with a foreign
        // issuer still reads as invalid.
        validation.validate_exp = false;
        validation.leeway = leeway.as_secs();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            audience,
            leeway,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Signs a token valid from now until `now + ttl`. A negative `ttl`
    /// yields a token that is already expired.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
        ttl: TimeDelta,
    ) -> Result<IssuedToken, CredentialError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iss: self.issuer.clone(),
            aud: Audience::Single(self.audience.clone()),
            iat: Some(now.timestamp()),
            nbf: Some(now.timestamp()),
            exp: (now + ttl).timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    pub(crate) fn sign<T: Serialize>(&self, claims: &T) -> Result<String, CredentialError> {
        let header = Header::new(TOKEN_ALGORITHM);
        jsonwebtoken::encode(&header, claims, &self.encoding_key)
            .map_err(|e| CredentialError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, CredentialError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| CredentialError::Invalid(e.to_string()))?;
        let claims = data.claims;

        // jsonwebtoken checks `aud` against the raw payload; keep the decoded
        // value consistent with it.
        if !claims.aud.contains(&self.audience) {
            return Err(CredentialError::Invalid("audience mismatch".to_string()));
        }

        let leeway = i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX);
        if Utc::now().timestamp() > claims.exp.saturating_add(leeway) {
            return Err(CredentialError::Expired);
        }

        let missing = claims.missing_identity_claims();
        if !missing.is_empty() {
            return Err(CredentialError::MissingClaims(missing));
        }

        Ok(claims)
    }
}
