//! Custom Axum extractors

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::server::AppState;

/// Username of the bearer-token holder.
///
/// Handlers that take this extractor reject unauthenticated requests with
/// 401 before any handler code runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Authorization header is required"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Bearer token is required"))?;

        let username = state.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        Ok(Self(username))
    }
}

/// Integer id taken from a named path segment.
async fn path_id<S>(
    parts: &mut Parts,
    state: &S,
    key: &str,
    resource: &str,
) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let invalid = || ApiError::bad_request(format!("invalid {resource} ID"));

    let Path(params): Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| invalid())?;

    params
        .get(key)
        .and_then(|raw| raw.parse::<i32>().ok())
        .ok_or_else(invalid)
}

/// `{thread_id}` path segment parsed as an integer
#[derive(Debug, Clone, Copy)]
pub struct ThreadIdParam(pub i32);

impl<S> FromRequestParts<S> for ThreadIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "thread_id", "thread").await.map(Self)
    }
}

/// `{comment_id}` path segment parsed as an integer
#[derive(Debug, Clone, Copy)]
pub struct CommentIdParam(pub i32);

impl<S> FromRequestParts<S> for CommentIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "comment_id", "comment").await.map(Self)
    }
}

/// `Json` whose rejection uses the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection uses the API error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
