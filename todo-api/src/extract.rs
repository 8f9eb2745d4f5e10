/// Request extractors for task routes
///
/// Axum runs `FromRequestParts` extractors in argument order before the body
/// extractor, so a handler declared as
///
/// ```text
/// async fn handler(State(..), OwnerScope(..), TaskPath(..), ValidatedJson(..))
/// ```
///
/// rejects a foreign `user_id` (403) before the task ID is parsed (400) and
/// before the body is read or validated (400).

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use todo_shared::auth::{authorization::require_owner, middleware::AuthContext, UserId};
use uuid::Uuid;
use validator::Validate;

/// Verified owner of the `/api/:user_id/...` scope
#[derive(Debug, Clone)]
pub struct OwnerScope(pub UserId);

/// Task ID from the `:task_id` path segment
#[derive(Debug, Clone, Copy)]
pub struct TaskPath(pub Uuid);

/// JSON body that has passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

async fn path_params<S>(parts: &mut Parts, state: &S) -> Result<HashMap<String, String>, ApiError>
where
    S: Send + Sync,
{
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    Ok(params)
}

#[async_trait]
impl<S> FromRequestParts<S> for OwnerScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        let params = path_params(parts, state).await?;

        let path_user_id = params
            .get("user_id")
            .ok_or_else(|| ApiError::BadRequest("Missing user id".to_string()))?;

        require_owner(path_user_id, &auth.user_id)?;

        Ok(Self(auth.user_id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TaskPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;

        params
            .get("task_id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(Self)
            .ok_or_else(|| ApiError::BadRequest("Invalid task id".to_string()))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}
