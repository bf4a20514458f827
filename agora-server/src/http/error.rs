//! API error type with IntoResponse
//!
//! Every failure becomes `{"error": <message>, "code": <code>}` with a
//! matching status. Storage and internal details are logged, never returned.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::{PasswordError, TokenError};
use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request or rejected input (400)
    BadRequest { message: String },

    /// Missing, invalid or expired credentials (401)
    Unauthorized { message: String },

    /// Caller does not own the resource (403)
    Forbidden { reason: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Mutations look their target up by id; a missing row there is the
    /// caller's bad input, so it is reported as 400 rather than 404.
    pub fn lookup_failed(self) -> Self {
        match self {
            Self::NotFound { resource, .. } => Self::bad_request(format!("invalid {resource} ID")),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            Self::Validation(e) => ("validation_error", e.to_string()),
            Self::BadRequest { message } => ("bad_request", message.clone()),
            Self::Unauthorized { message } => ("unauthorized", message.clone()),
            Self::Forbidden { reason } => ("forbidden", reason.clone()),
            Self::NotFound { resource, id } => {
                ("not_found", format!("{} '{}' not found", resource, id))
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                ("internal_error", "an internal error occurred".to_string())
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                ("internal_error", "an internal error occurred".to_string())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Forbidden { .. } => Self::Forbidden {
                reason: "unauthorised user".into(),
            },
            DbError::Conflict { field: "email" } => Self::bad_request("email already signed up"),
            DbError::Conflict { field } => Self::bad_request(format!("{field} already taken")),
            DbError::UnknownReference { resource, .. } => {
                Self::bad_request(format!("{resource} does not exist"))
            }
            _ => Self::Database(e),
        }
    }
}

/// Token failures reaching a handler come from signing, never from a
/// caller's credentials; the auth extractor maps those itself.
impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        Self::Internal {
            message: format!("could not generate token: {e}"),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        Self::Internal {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request("invalid request payload")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "title" });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title cannot be empty");
        assert_eq!(body["code"], "validation_error");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(DbError::NotFound {
            resource: "thread",
            id: "7".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lookup_failure_on_mutation_is_400() {
        let err = ApiError::from(DbError::NotFound {
            resource: "comment",
            id: "9".into(),
        })
        .lookup_failed();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid comment ID");
    }

    #[tokio::test]
    async fn ownership_mismatch_is_403() {
        let err = ApiError::from(DbError::Forbidden { resource: "thread" });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "unauthorised user");
    }

    #[tokio::test]
    async fn conflicts_name_the_field() {
        let (status, body) = body_json(DbError::Conflict { field: "username" }.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "username already taken");

        let (_, body) = body_json(DbError::Conflict { field: "email" }.into()).await;
        assert_eq!(body["error"], "email already signed up");
    }

    #[tokio::test]
    async fn storage_errors_hide_detail() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "an internal error occurred");
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let err = ApiError::unauthorized("Bearer token is required");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
