use serde::{Deserialize, Serialize};

use crate::auth::outcome::CallerIdentity;

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Multiple(values) => values.iter().any(|value| value == audience),
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::Single(value) => f.write_str(value),
            Audience::Multiple(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Token payload: identity fields plus the registered claims checked on
/// every request. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    pub iss: String,
    pub aud: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    pub exp: i64,
}

impl Claims {
    /// Names of identity claims that are absent or blank.
    pub fn missing_identity_claims(&self) -> Vec<&'static str> {
        [
            ("user_id", &self.user_id),
            ("username", &self.username),
            ("role", &self.role),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}
