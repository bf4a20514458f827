//! User repository
//!
//! Usernames and emails are unique in the schema; a racing duplicate signup
//! surfaces as `DbError::Conflict` from the insert itself.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{unique_violation, DbError};
use crate::models::{Bio, Email, Username};

/// User record (password column excluded)
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated signup data with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub bio: Option<Bio>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, password, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, bio, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.email.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(map_unique)
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, DbError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, DbError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }

    /// Fetch a profile by username.
    pub async fn get_by_username(&self, username: &str) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, username, email, bio, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", username))
    }

    /// Resolve a username to its id; `None` when no such user.
    pub async fn id_by_username(&self, username: &str) -> Result<Option<i32>, DbError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    /// Stored password (hash or legacy plaintext) for login.
    pub async fn stored_password(&self, username: &str) -> Result<Option<String>, DbError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    /// Apply a partial profile update to `current`'s row.
    pub async fn update(&self, current: &str, patch: UserPatch) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                bio = COALESCE($3, bio)
            WHERE username = $1
            RETURNING id, username, email, bio, created_at
            "#,
        )
        .bind(current)
        .bind(patch.username.as_ref().map(Username::as_str))
        .bind(patch.bio.as_ref().map(Bio::as_str))
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique)?
        .ok_or_else(|| DbError::not_found("user", current))
    }
}

fn map_unique(err: sqlx::Error) -> DbError {
    match unique_violation(&err) {
        Some(constraint) if constraint.contains("email") => DbError::Conflict { field: "email" },
        Some(_) => DbError::Conflict { field: "username" },
        None => DbError::Sqlx(err),
    }
}
