//! Bearer-token authentication.
//!
//! [`token::TokenAuthority`] issues and validates HS256 tokens, the HTTP
//! middleware turns each request into an [`outcome::AuthOutcome`], and
//! [`gate::AuthorizationGate`] decides at tool-call time.

pub mod claims;
pub mod gate;
pub mod outcome;
pub mod token;

pub use claims::{Audience, Claims};
pub use gate::{Admission, AuthDenied, AuthorizationGate};
pub use outcome::{AuthErrorKind, AuthOutcome, CallerIdentity};
pub use token::{CredentialError, IssuedToken, TOKEN_ALGORITHM, TokenAuthority};
