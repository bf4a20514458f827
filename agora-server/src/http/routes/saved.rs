//! Saved-thread bookmarks

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::threads::MessageResponse;
use crate::db::repos::SavedThreadRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ThreadIdParam};
use crate::http::server::AppState;

/// POST /threads/{thread_id}/save
async fn save_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    SavedThreadRepo::new(&state.pool)
        .save(&username, thread_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "thread saved successfully",
    }))
}

/// DELETE /threads/{thread_id}/save
async fn unsave_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(thread_id): ThreadIdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    SavedThreadRepo::new(&state.pool)
        .unsave(&username, thread_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "thread unsaved successfully",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/threads/{thread_id}/save",
        post(save_thread).delete(unsave_thread),
    )
}
