//! Account endpoints: signup, login, profiles and saved threads

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::threads::ThreadListResponse;
use crate::auth::{hash_password, verify_password};
use crate::db::repos::{NewUser, ThreadRepo, User, UserPatch, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, AuthUser};
use crate::http::server::AppState;
use crate::models::{Bio, Email, PageParams, Password, ThreadFilter, Username, ValidationError};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
}

/// Public profile
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub joined: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio.unwrap_or_default(),
            joined: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_in: i64,
}

impl UpdateUserRequest {
    fn validate(self) -> Result<UserPatch, ValidationError> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .map(|u| Username::new(&u))
            .transpose()?;
        let bio = self
            .bio
            .filter(|b| !b.is_empty())
            .map(|b| Bio::new(&b))
            .transpose()?;
        Ok(UserPatch { username, bio })
    }
}

/// POST /signup
async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    // Shape checks come first so invalid input never reaches storage.
    let username = Username::new(&req.username)?;
    let password = Password::new(&req.password)?;
    let email = Email::new(&req.email)?;

    let users = UserRepo::new(&state.pool);
    if users.username_taken(username.as_str()).await? {
        return Err(ApiError::bad_request("username already taken"));
    }
    if users.email_taken(email.as_str()).await? {
        return Err(ApiError::bad_request("email already signed up"));
    }

    let password_hash = hash_password(password.as_str())?;
    let user = users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: Some("user created successfully"),
            user: user.into(),
        }),
    ))
}

/// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = Username::new(&req.username)?;
    let password = Password::new(&req.password)?;

    let stored = UserRepo::new(&state.pool)
        .stored_password(username.as_str())
        .await?
        .ok_or_else(|| ApiError::unauthorized("username does not exist"))?;

    if !verify_password(&stored, password.as_str()) {
        tracing::debug!(username = %username.as_str(), "login rejected");
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = state.tokens.issue(username.as_str())?;
    Ok(Json(LoginResponse {
        message: "login successful",
        token,
        expires_in: state.tokens.ttl_seconds(),
    }))
}

/// GET /user/{username}
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = UserRepo::new(&state.pool).get_by_username(&username).await?;
    Ok(Json(UserEnvelope {
        message: None,
        user: user.into(),
    }))
}

/// PUT /user/{username} - callers may only edit their own profile
async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(username): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    if caller != username {
        return Err(ApiError::Forbidden {
            reason: "unauthorised user".into(),
        });
    }

    let patch = req.validate()?;
    let user = UserRepo::new(&state.pool).update(&caller, patch).await?;

    Ok(Json(UserEnvelope {
        message: Some("user updated successfully"),
        user: user.into(),
    }))
}

/// GET /user/{username}/saved - threads the user bookmarked
async fn saved_threads(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<ThreadListResponse>, ApiError> {
    let page = params.parse()?;
    let filter = ThreadFilter {
        saved_by: Some(username),
        ..Default::default()
    };

    let result = ThreadRepo::new(&state.pool).list(&filter, page).await?;
    Ok(Json(ThreadListResponse::from(result)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/user/{username}", get(get_user).put(update_user))
        .route("/user/{username}/saved", get(saved_threads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_fields_are_ignored() {
        let patch = UpdateUserRequest {
            username: Some(String::new()),
            bio: Some(String::new()),
        }
        .validate()
        .unwrap();
        assert!(patch.username.is_none());
        assert!(patch.bio.is_none());
    }

    #[test]
    fn new_username_is_validated() {
        let result = UpdateUserRequest {
            username: Some("no spaces".into()),
            bio: None,
        }
        .validate();
        assert!(result.is_err());
    }

    #[test]
    fn null_bio_renders_as_empty_string() {
        let user = User {
            id: 4,
            username: "alice".into(),
            email: "alice@example.com".into(),
            bio: None,
            created_at: chrono::Utc::now(),
        };
        let response = UserResponse::from(user);
        assert_eq!(response.bio, "");
    }
}
