/// JWT token settings, decoding and issuing
///
/// Tokens are signed with a shared secret using one of the HMAC algorithms
/// (HS256, HS384, HS512). The backend never signs users in itself; tokens are
/// minted by the identity front end, and [`issue_token`] exists for local
/// development and tests.
///
/// # Claims
///
/// - `sub`: Subject (user ID, opaque string)
/// - `iat`: Issued at (Unix timestamp, optional)
/// - `exp`: Expiration (Unix timestamp, optional)
///
/// Any other claims in the payload (e.g. `email`) are ignored.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use todo_shared::auth::jwt::{decode_token, issue_token, TokenClaims, TokenSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = TokenSettings::hs256("your-secret-key-at-least-32-bytes");
/// let claims = TokenClaims::for_subject("user-123", Utc::now(), Duration::hours(1));
///
/// let token = issue_token(&claims, &settings)?;
/// let decoded = decode_token(&token, &settings)?;
/// assert_eq!(decoded.sub.as_deref(), Some("user-123"));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use jsonwebtoken::Algorithm;

/// Default lifetime of issued tokens, in hours
pub const DEFAULT_EXPIRATION_HOURS: i64 = 1;

/// Longest accepted token lifetime, in hours (one year)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token could not be decoded or its signature did not verify
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Configured algorithm is not a shared-secret algorithm
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token lifetime outside `1..=MAX_EXPIRATION_HOURS`
    #[error("Token lifetime must be between 1 and {max} hours, got {0}", max = MAX_EXPIRATION_HOURS)]
    InvalidLifetime(i64),
}

/// Checks a configured token lifetime
pub fn check_expiration_hours(hours: i64) -> Result<i64, JwtError> {
    if (1..=MAX_EXPIRATION_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(JwtError::InvalidLifetime(hours))
    }
}

/// Shared-secret signing configuration
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Shared HMAC secret
    pub secret: String,

    /// Signing algorithm (HMAC family only)
    pub algorithm: Algorithm,

    /// Lifetime of tokens minted by [`issue_token`] callers
    pub expiration_hours: i64,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl TokenSettings {
    /// Creates settings for the given secret and algorithm
    ///
    /// # Errors
    ///
    /// Returns `JwtError::UnsupportedAlgorithm` for anything outside the
    /// HMAC family, since only a shared secret is available.
    pub fn new(secret: impl Into<String>, algorithm: Algorithm) -> Result<Self, JwtError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            secret: secret.into(),
            algorithm,
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        })
    }

    /// Shorthand for HS256 settings with the default lifetime
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }

    /// Overrides the lifetime of issued tokens
    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Token lifetime as a duration, clamped to `MAX_EXPIRATION_HOURS`
    pub fn lifetime(&self) -> Duration {
        Duration::hours(self.expiration_hours.clamp(0, MAX_EXPIRATION_HOURS))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked by the auth guard against an injected clock,
        // so exp is optional here and never validated by the library.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }
}

/// Parses an algorithm name such as `HS256` (case-insensitive)
///
/// # Example
///
/// ```
/// use jsonwebtoken::Algorithm;
/// use todo_shared::auth::jwt::parse_algorithm;
///
/// assert_eq!(parse_algorithm("hs384").unwrap(), Algorithm::HS384);
/// assert!(parse_algorithm("RS256").is_err());
/// ```
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    let algorithm = name
        .trim()
        .to_ascii_uppercase()
        .parse::<Algorithm>()
        .map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(JwtError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Creates claims for a subject, issued at `now` and valid for `lifetime`
    pub fn for_subject(subject: impl Into<String>, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: Some(subject.into()),
            iat: Some(now.timestamp()),
            exp: Some(
                now.checked_add_signed(lifetime)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
                    .timestamp(),
            ),
        }
    }

    /// Checks whether the token is expired at `now`
    ///
    /// A token without `exp` never expires. A token whose `exp` equals the
    /// current second is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp <= now.timestamp(),
            None => false,
        }
    }
}

/// Signs claims into a compact JWT
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn issue_token(claims: &TokenClaims, settings: &TokenSettings) -> Result<String, JwtError> {
    let header = Header::new(settings.algorithm);
    let key = EncodingKey::from_secret(settings.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies the signature of a token and returns its claims
///
/// Only signature, algorithm and payload shape are checked; expiry and
/// subject rules belong to [`crate::auth::guard`].
///
/// # Errors
///
/// Returns `JwtError::InvalidToken` if the token is garbage, signed with a
/// different secret, or signed with a different algorithm.
pub fn decode_token(token: &str, settings: &TokenSettings) -> Result<TokenClaims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let token_data = decode::<TokenClaims>(token, &key, &settings.validation())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}
