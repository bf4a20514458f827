//! Thread endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewThread, Thread, ThreadPatch, ThreadRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, AuthUser, ThreadIdParam};
use crate::http::server::AppState;
use crate::models::{
    Paginated, TagName, ThreadContent, ThreadListParams, ThreadTitle, ValidationError,
};

/// Create thread request
#[derive(Deserialize)]
pub struct CreateThreadRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Edit thread request; empty or missing fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateThreadRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Thread response
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: i32,
    pub username: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
    pub votes: i64,
    pub tags: Vec<String>,
}

impl From<Thread> for ThreadResponse {
    fn from(t: Thread) -> Self {
        Self {
            id: t.id,
            username: t.username,
            title: t.title,
            content: t.content,
            category: t.category,
            created_at: t.created_at.to_rfc3339(),
            votes: t.votes,
            tags: t.tags,
        }
    }
}

/// One page of threads
#[derive(Debug, Serialize)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
}

impl From<Paginated<Thread>> for ThreadListResponse {
    fn from(page: Paginated<Thread>) -> Self {
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        Self {
            threads: page.items.into_iter().map(ThreadResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages,
            has_next,
        }
    }
}

#[derive(Serialize)]
pub struct ThreadEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub thread: ThreadResponse,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl CreateThreadRequest {
    fn validate(self) -> Result<NewThread, ValidationError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::Empty { field: "category" });
        }

        Ok(NewThread {
            title: ThreadTitle::new(&self.title)?,
            content: ThreadContent::new(&self.content)?,
            category: category.to_owned(),
            tags: TagName::parse_list(&self.tags)?,
        })
    }
}

impl UpdateThreadRequest {
    fn validate(self) -> Result<ThreadPatch, ValidationError> {
        let tags = match self.tags {
            Some(raw) => Some(TagName::parse_list(&raw)?).filter(|t| !t.is_empty()),
            None => None,
        };

        Ok(ThreadPatch {
            title: present(self.title).map(|t| ThreadTitle::new(&t)).transpose()?,
            content: present(self.content)
                .map(|c| ThreadContent::new(&c))
                .transpose()?,
            category: present(self.category).map(|c| c.trim().to_owned()),
            tags,
        })
    }
}

/// GET /threads - list, filter and paginate threads
async fn list_threads(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ThreadListParams>,
) -> Result<Json<ThreadListResponse>, ApiError> {
    let (filter, page) = params.into_parts()?;
    let result = ThreadRepo::new(&state.pool).list(&filter, page).await?;
    Ok(Json(ThreadListResponse::from(result)))
}

/// GET /threads/{thread_id} - a single thread with tags and votes
async fn get_thread(
    State(state): State<Arc<AppState>>,
    ThreadIdParam(id): ThreadIdParam,
) -> Result<Json<ThreadEnvelope>, ApiError> {
    let thread = ThreadRepo::new(&state.pool).get(id).await?;
    Ok(Json(ThreadEnvelope {
        message: None,
        thread: thread.into(),
    }))
}

/// POST /threads/post - create a thread with optional tags
async fn create_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ApiJson(req): ApiJson<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadEnvelope>), ApiError> {
    let input = req.validate()?;
    let thread = ThreadRepo::new(&state.pool).create(&username, input).await?;

    tracing::info!(thread_id = thread.id, %username, "thread created");
    Ok((
        StatusCode::CREATED,
        Json(ThreadEnvelope {
            message: Some("thread created successfully"),
            thread: thread.into(),
        }),
    ))
}

/// PUT /threads/{thread_id} - owner-only partial edit
async fn update_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(id): ThreadIdParam,
    ApiJson(req): ApiJson<UpdateThreadRequest>,
) -> Result<Json<ThreadEnvelope>, ApiError> {
    let patch = req.validate()?;
    let thread = ThreadRepo::new(&state.pool)
        .update(id, &username, patch)
        .await
        .map_err(|e| ApiError::from(e).lookup_failed())?;

    Ok(Json(ThreadEnvelope {
        message: Some("thread updated successfully"),
        thread: thread.into(),
    }))
}

/// DELETE /threads/{thread_id} - owner-only delete
async fn delete_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    ThreadIdParam(id): ThreadIdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    ThreadRepo::new(&state.pool)
        .delete(id, &username)
        .await
        .map_err(|e| ApiError::from(e).lookup_failed())?;

    tracing::info!(thread_id = id, %username, "thread deleted");
    Ok(Json(MessageResponse {
        message: "thread deleted successfully",
    }))
}

/// Thread routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/threads", get(list_threads))
        .route("/threads/post", post(create_thread))
        .route(
            "/threads/{thread_id}",
            get(get_thread).put(update_thread).delete(delete_thread),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_category() {
        let req = CreateThreadRequest {
            title: "Lifetimes".into(),
            content: "Why does this not compile?".into(),
            category: "  ".into(),
            tags: vec![],
        };
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::Empty { field: "category" }
        );
    }

    #[test]
    fn create_request_skips_blank_tags() {
        let req = CreateThreadRequest {
            title: "Lifetimes".into(),
            content: "Why does this not compile?".into(),
            category: "technology".into(),
            tags: vec!["rust".into(), " ".into(), "borrowck".into()],
        };
        let input = req.validate().unwrap();
        let names: Vec<_> = input.tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, ["rust", "borrowck"]);
    }

    #[test]
    fn empty_update_fields_leave_thread_unchanged() {
        let req = UpdateThreadRequest {
            title: Some("New title".into()),
            content: Some("".into()),
            category: None,
            tags: Some(vec![]),
        };
        let patch = req.validate().unwrap();
        assert_eq!(patch.title.as_ref().map(ThreadTitle::as_str), Some("New title"));
        assert!(patch.content.is_none());
        assert!(patch.category.is_none());
        assert!(patch.tags.is_none());
    }

    #[test]
    fn oversized_title_in_update_is_rejected() {
        let req = UpdateThreadRequest {
            title: Some("x".repeat(256)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
