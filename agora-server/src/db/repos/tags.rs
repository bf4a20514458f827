//! Tag repository
//!
//! Tag ids are resolved with one sorted insert plus one lookup, so two
//! callers racing on the first use of a name both get the same id.

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor, PgPool};

use super::DbError;
use crate::models::TagName;

pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the id for `name`, creating the tag on first use.
    /// Names that differ only in case share an id.
    pub async fn get_or_create_id(&self, name: &TagName) -> Result<i32, DbError> {
        let mut conn = self.pool.acquire().await?;
        get_or_create_tag_id(&mut conn, name).await
    }

    /// Tag names for a set of threads, keyed by thread id.
    pub async fn names_for_threads(&self, thread_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>, DbError> {
        names_for_threads(self.pool, thread_ids).await
    }
}

pub(crate) async fn get_or_create_tag_id(
    conn: &mut PgConnection,
    name: &TagName,
) -> Result<i32, DbError> {
    let ids = resolve_tag_ids(conn, std::slice::from_ref(name)).await?;
    ids.into_iter()
        .next()
        .ok_or_else(|| DbError::not_found("tag", name.as_str()))
}

/// Ids for every tag in `tags`, creating missing ones.
///
/// Names are deduplicated case-insensitively and inserted in lowercase order,
/// so concurrent writers take the unique-index locks in the same sequence.
pub(crate) async fn resolve_tag_ids(
    conn: &mut PgConnection,
    tags: &[TagName],
) -> Result<Vec<i32>, DbError> {
    let mut names: Vec<String> = tags.iter().map(|t| t.as_str().to_owned()).collect();
    names.sort_by_key(|n| n.to_lowercase());
    names.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());

    if names.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query(
        r#"
        INSERT INTO tags (name)
        SELECT n FROM UNNEST($1::text[]) AS n
        ORDER BY lower(n)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(&names)
    .execute(&mut *conn)
    .await?;

    let ids: Vec<(i32,)> = sqlx::query_as(
        r#"
        SELECT id FROM tags
        WHERE name = ANY($1::citext[])
        ORDER BY lower(name::text)
        "#,
    )
    .bind(&names)
    .fetch_all(conn)
    .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Link `thread_id` to each tag, creating tags as needed.
/// Links that already exist are left alone.
pub(crate) async fn associate_thread_tags(
    conn: &mut PgConnection,
    thread_id: i32,
    tags: &[TagName],
) -> Result<(), DbError> {
    let tag_ids = resolve_tag_ids(&mut *conn, tags).await?;
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO thread_tags (thread_id, tag_id)
        SELECT $1, id FROM UNNEST($2::int[]) AS id
        ORDER BY id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(thread_id)
    .bind(&tag_ids)
    .execute(conn)
    .await?;

    Ok(())
}

/// Replace the thread's whole tag set.
pub(crate) async fn replace_thread_tags(
    conn: &mut PgConnection,
    thread_id: i32,
    tags: &[TagName],
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM thread_tags WHERE thread_id = $1")
        .bind(thread_id)
        .execute(&mut *conn)
        .await?;

    associate_thread_tags(conn, thread_id, tags).await
}

/// One query for every thread on a page.
pub(crate) async fn names_for_threads<'e, E>(
    executor: E,
    thread_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbError>
where
    E: PgExecutor<'e>,
{
    if thread_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, String)> = sqlx::query_as(
        r#"
        SELECT tt.thread_id, tg.name::text
        FROM thread_tags tt
        JOIN tags tg ON tg.id = tt.tag_id
        WHERE tt.thread_id = ANY($1)
        ORDER BY tt.thread_id, tg.name
        "#,
    )
    .bind(thread_ids)
    .fetch_all(executor)
    .await?;

    let mut by_thread: HashMap<i32, Vec<String>> = HashMap::new();
    for (thread_id, name) in rows {
        by_thread.entry(thread_id).or_default().push(name);
    }
    Ok(by_thread)
}

