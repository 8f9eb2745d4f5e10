/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`jwt`]: Token settings, decoding and issuing (HMAC shared secret)
/// - [`guard`]: `Authorization` header → verified [`UserId`]
/// - [`authorization`]: Ownership check of the `user_id` path segment
/// - [`middleware`]: Request-scoped [`AuthContext`](middleware::AuthContext)
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use todo_shared::auth::{authorization::require_owner, guard::authenticate};
/// use todo_shared::auth::jwt::{issue_token, TokenClaims, TokenSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = TokenSettings::hs256("your-secret-key-at-least-32-bytes");
/// let claims = TokenClaims::for_subject("alice", Utc::now(), Duration::hours(1));
/// let header = format!("Bearer {}", issue_token(&claims, &settings)?);
///
/// let user_id = authenticate(Some(&header), &settings, Utc::now())?;
/// require_owner("alice", &user_id)?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod guard;
pub mod jwt;
pub mod middleware;

pub use guard::{AuthError, UserId};
