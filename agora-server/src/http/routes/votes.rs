//! Vote endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::threads::MessageResponse;
use crate::db::repos::{UserRepo, Vote, VoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, AuthUser, ThreadIdParam};
use crate::http::server::AppState;
use crate::models::VoteValue;

#[derive(Deserialize)]
pub struct VoteRequest {
    pub vote: i64,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: i32,
    pub thread_id: i32,
    pub username: String,
    pub vote: i16,
    pub created_at: String,
}

impl VoteResponse {
    fn new(vote: Vote, username: String) -> Self {
        Self {
            id: vote.id,
            thread_id: vote.thread_id,
            username,
            vote: vote.vote,
            created_at: vote.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct VoteEnvelope {
    pub message: &'static str,
    pub vote: VoteResponse,
}

#[derive(Serialize)]
pub struct VoteCountResponse {
    pub votes: i64,
}

#[derive(Serialize)]
pub struct VoteStateResponse {
    pub vote_state: i16,
}

/// POST /threads/{thread_id}/votes - cast or change a vote
async fn cast_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(thread_id): ThreadIdParam,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<(StatusCode, Json<VoteEnvelope>), ApiError> {
    let value = VoteValue::try_from(req.vote)?;
    let vote = VoteRepo::new(&state.pool)
        .cast(thread_id, &username, value)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VoteEnvelope {
            message: "vote casted successfully",
            vote: VoteResponse::new(vote, username),
        }),
    ))
}

/// DELETE /threads/{thread_id}/votes - withdraw a vote; absent is fine
async fn delete_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = VoteRepo::new(&state.pool)
        .delete(thread_id, &username)
        .await?;
    tracing::debug!(thread_id, %username, removed, "vote withdrawn");

    Ok(Json(MessageResponse {
        message: "vote deleted successfully",
    }))
}

/// GET /threads/{thread_id}/votes - net score
async fn count_votes(
    State(state): State<Arc<AppState>>,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<VoteCountResponse>, ApiError> {
    let votes = VoteRepo::new(&state.pool).count(thread_id).await?;
    Ok(Json(VoteCountResponse { votes }))
}

#[derive(Deserialize)]
struct VoteStatePath {
    username: String,
}

/// GET /{username}/{thread_id}/vote_state - that user's vote, 0 if none
async fn vote_state(
    State(state): State<Arc<AppState>>,
    Path(VoteStatePath { username }): Path<VoteStatePath>,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<VoteStateResponse>, ApiError> {
    let user_id = UserRepo::new(&state.pool)
        .id_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: username,
        })?;

    let vote_state = VoteRepo::new(&state.pool).state(thread_id, user_id).await?;
    Ok(Json(VoteStateResponse { vote_state }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/threads/{thread_id}/votes",
            get(count_votes).post(cast_vote).delete(delete_vote),
        )
        .route("/{username}/{thread_id}/vote_state", get(vote_state))
}
