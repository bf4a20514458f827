//! Comment endpoints
//!
//! Comments are addressed by their own id; the thread id in edit and delete
//! paths is only checked for shape.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::threads::MessageResponse;
use crate::db::repos::{Comment, CommentRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, AuthUser, CommentIdParam, ThreadIdParam};
use crate::http::server::AppState;
use crate::models::CommentContent;

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub thread_id: i32,
    pub username: String,
    pub content: String,
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            thread_id: c.thread_id,
            username: c.username,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct CommentEnvelope {
    pub message: &'static str,
    pub comment: CommentResponse,
}

#[derive(Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

/// GET /threads/{thread_id}/comments
async fn list_comments(
    State(state): State<Arc<AppState>>,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<CommentListResponse>, ApiError> {
    let comments = CommentRepo::new(&state.pool)
        .list_for_thread(thread_id)
        .await?;

    Ok(Json(CommentListResponse {
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// POST /threads/{thread_id}/comments
async fn add_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(thread_id): ThreadIdParam,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<CommentEnvelope>), ApiError> {
    let content = CommentContent::new(&req.content)?;
    let comment = CommentRepo::new(&state.pool)
        .create(thread_id, &username, &content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            message: "comment created successfully",
            comment: comment.into(),
        }),
    ))
}

/// PUT /threads/{thread_id}/comments/{comment_id}
async fn edit_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(_): ThreadIdParam,
    CommentIdParam(comment_id): CommentIdParam,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<Json<CommentEnvelope>, ApiError> {
    let content = CommentContent::new(&req.content)?;
    let comment = CommentRepo::new(&state.pool)
        .update(comment_id, &username, &content)
        .await
        .map_err(|e| ApiError::from(e).lookup_failed())?;

    Ok(Json(CommentEnvelope {
        message: "comment updated successfully",
        comment: comment.into(),
    }))
}

/// DELETE /threads/{thread_id}/comments/{comment_id}
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(_): ThreadIdParam,
    CommentIdParam(comment_id): CommentIdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    CommentRepo::new(&state.pool)
        .delete(comment_id, &username)
        .await
        .map_err(|e| ApiError::from(e).lookup_failed())?;

    Ok(Json(MessageResponse {
        message: "comment deleted successfully",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/threads/{thread_id}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/threads/{thread_id}/comments/{comment_id}",
            put(edit_comment).delete(delete_comment),
        )
}
