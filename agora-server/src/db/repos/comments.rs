//! Comment repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use super::{ensure_owner, is_foreign_key_violation, DbError};
use crate::models::CommentContent;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i32,
    pub thread_id: i32,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a thread. A missing thread surfaces through the
    /// foreign key rather than a separate existence check.
    pub async fn create(
        &self,
        thread_id: i32,
        author: &str,
        content: &CommentContent,
    ) -> Result<Comment, DbError> {
        let row: Option<Comment> = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO comments (thread_id, user_id, content)
                SELECT $1, u.id, $3
                FROM users u
                WHERE u.username = $2
                RETURNING id, thread_id, user_id, content, created_at
            )
            SELECT i.id, i.thread_id, u.username, i.content, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(thread_id)
        .bind(author)
        .bind(content.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::not_found("thread", thread_id)
            } else {
                DbError::Sqlx(e)
            }
        })?;

        row.ok_or_else(|| DbError::not_found("user", author))
    }

    /// Comments on a thread, oldest first. An unknown thread yields an
    /// empty list.
    pub async fn list_for_thread(&self, thread_id: i32) -> Result<Vec<Comment>, DbError> {
        let comments = sqlx::query_as(
            r#"
            SELECT c.id, c.thread_id, u.username, c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.thread_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(thread_id)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn get(&self, id: i32) -> Result<Comment, DbError> {
        sqlx::query_as(
            r#"
            SELECT c.id, c.thread_id, u.username, c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("comment", id))
    }

    /// Replace the comment body if `caller` wrote it.
    pub async fn update(
        &self,
        id: i32,
        caller: &str,
        content: &CommentContent,
    ) -> Result<Comment, DbError> {
        let mut tx = self.pool.begin().await?;

        let owner = lock_owner(&mut tx, id).await?;
        ensure_owner("comment", &owner, caller)?;

        sqlx::query("UPDATE comments SET content = $2 WHERE id = $1")
            .bind(id)
            .bind(content.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i32, caller: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let owner = lock_owner(&mut tx, id).await?;
        ensure_owner("comment", &owner, caller)?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn lock_owner(conn: &mut PgConnection, id: i32) -> Result<String, DbError> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT u.username
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.id = $1
        FOR UPDATE OF c
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(|r| r.0)
        .ok_or_else(|| DbError::not_found("comment", id))
}
