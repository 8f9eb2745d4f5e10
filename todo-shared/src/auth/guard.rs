/// Bearer token guard
///
/// Turns a raw `Authorization` header value into a verified [`UserId`].
/// Everything here is a pure function of the header, the token settings and
/// the clock, so it can be exercised without a server or a database.
///
/// # Checks (in order)
///
/// 1. Header present
/// 2. Exactly two whitespace-separated parts, the first being `Bearer`
///    (case-insensitive)
/// 3. Signature valid for the configured secret and algorithm
/// 4. `exp`, when present, strictly in the future
/// 5. `sub` present and non-empty
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use todo_shared::auth::guard::authenticate;
/// use todo_shared::auth::jwt::{issue_token, TokenClaims, TokenSettings};
///
/// let settings = TokenSettings::hs256("your-secret-key-at-least-32-bytes");
/// let claims = TokenClaims::for_subject("user-123", Utc::now(), Duration::hours(1));
/// let header = format!("Bearer {}", issue_token(&claims, &settings).unwrap());
///
/// let user_id = authenticate(Some(&header), &settings, Utc::now()).unwrap();
/// assert_eq!(user_id.as_str(), "user-123");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::jwt::{decode_token, TokenSettings};

/// Verified identity of the caller (the token subject)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a subject, rejecting empty strings
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a request fails authentication
///
/// Every variant maps to HTTP 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Authorization header missing")]
    MissingHeader,

    /// Header is not `Bearer <token>`
    #[error("Invalid authorization header format. Expected 'Bearer <token>'")]
    MalformedHeader,

    /// Token is undecodable or its signature does not verify
    #[error("Invalid authentication token")]
    InvalidSignature,

    /// Token `exp` is not in the future
    #[error("Token has expired")]
    Expired,

    /// Token has no usable `sub` claim
    #[error("Invalid token payload: missing user ID")]
    MissingSubject,
}

/// Extracts the token from a `Bearer <token>` header value
///
/// # Example
///
/// ```
/// use todo_shared::auth::guard::{bearer_token, AuthError};
///
/// assert_eq!(bearer_token("bearer abc").unwrap(), "abc");
/// assert_eq!(bearer_token("Bearer"), Err(AuthError::MalformedHeader));
/// assert_eq!(bearer_token("Basic abc"), Err(AuthError::MalformedHeader));
/// ```
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Verifies a bare token and returns its subject
pub fn verify_token(
    token: &str,
    settings: &TokenSettings,
    now: DateTime<Utc>,
) -> Result<UserId, AuthError> {
    let claims = decode_token(token, settings).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        AuthError::InvalidSignature
    })?;

    if claims.is_expired_at(now) {
        return Err(AuthError::Expired);
    }

    claims
        .sub
        .and_then(UserId::new)
        .ok_or(AuthError::MissingSubject)
}

/// Authenticates a request from its `Authorization` header value
///
/// `header` is `None` when the header is absent or not valid UTF-8.
pub fn authenticate(
    header: Option<&str>,
    settings: &TokenSettings,
    now: DateTime<Utc>,
) -> Result<UserId, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = bearer_token(header)?;

    verify_token(token, settings, now)
}
