//! Saved-thread bookmarks

use sqlx::PgPool;

use super::{is_foreign_key_violation, DbError};

pub struct SavedThreadRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SavedThreadRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Bookmark a thread. Saving twice is a no-op.
    pub async fn save(&self, username: &str, thread_id: i32) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_threads (user_id, thread_id)
            SELECT u.id, $2
            FROM users u
            WHERE u.username = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(username)
        .bind(thread_id)
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(DbError::not_found("thread", thread_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a bookmark. Returns whether one existed.
    pub async fn unsave(&self, username: &str, thread_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_threads
            USING users u
            WHERE user_threads.user_id = u.id
              AND u.username = $1
              AND user_threads.thread_id = $2
            "#,
        )
        .bind(username)
        .bind(thread_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
