/// Request authentication context for Axum
///
/// The API's auth layer runs the [guard](super::guard) and stores an
/// [`AuthContext`] in the request extensions. Handlers and extractors pick
/// it up either through `Extension<AuthContext>` or by using `AuthContext`
/// directly as an extractor.
///
/// # Example
///
/// ```
/// use todo_shared::auth::middleware::AuthContext;
///
/// async fn handler(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use super::guard::{authenticate, AuthError, UserId};
use super::jwt::TokenSettings;

/// Authenticated caller, added to request extensions after the guard passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Token subject
    pub user_id: UserId,
}

impl AuthContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Runs the guard against the `Authorization` header of a request
    pub fn from_headers(
        headers: &HeaderMap,
        settings: &TokenSettings,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        authenticate(header, settings, now).map(Self::new)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent only when a route was mounted outside the auth layer
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingHeader)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
