//! Vote repository
//!
//! One vote per (thread, user), enforced by the primary key. Casting again
//! overwrites the previous value in the same statement.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{is_foreign_key_violation, DbError};
use crate::models::VoteValue;

#[derive(Debug, Clone, FromRow)]
pub struct Vote {
    pub id: i32,
    pub thread_id: i32,
    pub vote: i16,
    pub created_at: DateTime<Utc>,
}

pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite `username`'s vote on a thread.
    pub async fn cast(
        &self,
        thread_id: i32,
        username: &str,
        value: VoteValue,
    ) -> Result<Vote, DbError> {
        let row: Option<Vote> = sqlx::query_as(
            r#"
            INSERT INTO votes (thread_id, user_id, vote)
            SELECT $1, u.id, $3
            FROM users u
            WHERE u.username = $2
            ON CONFLICT (thread_id, user_id) DO UPDATE SET vote = EXCLUDED.vote
            RETURNING id, thread_id, vote, created_at
            "#,
        )
        .bind(thread_id)
        .bind(username)
        .bind(value.as_i16())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::not_found("thread", thread_id)
            } else {
                DbError::Sqlx(e)
            }
        })?;

        let vote = row.ok_or_else(|| DbError::not_found("user", username))?;
        tracing::debug!(thread_id, username, vote = vote.vote, "vote recorded");
        Ok(vote)
    }

    /// Withdraw a vote. Returns whether a row was removed; withdrawing a
    /// vote that was never cast is not an error.
    pub async fn delete(&self, thread_id: i32, username: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM votes
            USING users u
            WHERE votes.user_id = u.id
              AND u.username = $2
              AND votes.thread_id = $1
            "#,
        )
        .bind(thread_id)
        .bind(username)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Net score: sum of all vote values, zero when none.
    pub async fn count(&self, thread_id: i32) -> Result<i64, DbError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(vote), 0)::BIGINT FROM votes WHERE thread_id = $1")
                .bind(thread_id)
                .fetch_one(self.pool)
                .await?;
        Ok(row.0)
    }

    /// The user's current vote on a thread: -1, 0 or 1.
    pub async fn state(&self, thread_id: i32, user_id: i32) -> Result<i16, DbError> {
        let row: Option<(i16,)> =
            sqlx::query_as("SELECT vote FROM votes WHERE thread_id = $1 AND user_id = $2")
                .bind(thread_id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map_or(0, |r| r.0))
    }
}
