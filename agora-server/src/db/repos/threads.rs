//! Thread repository
//!
//! Handles thread CRUD with:
//! - Atomic creation with tag association (transaction)
//! - Filtered, paginated listing built with `QueryBuilder`
//! - Ownership-gated edits and deletes under a row lock

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder, Row};

use super::categories::category_id;
use super::tags::{associate_thread_tags, names_for_threads, replace_thread_tags};
use super::{ensure_owner, DbError};
use crate::models::{
    contains_pattern, Paginated, Pagination, TagName, ThreadContent, ThreadFilter, ThreadSort,
    ThreadTitle,
};

/// Thread with author, category name, net votes and tags
#[derive(Debug, Clone, FromRow)]
pub struct Thread {
    pub id: i32,
    pub username: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

/// Validated input for a new thread
#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: ThreadTitle,
    pub content: ThreadContent,
    pub category: String,
    pub tags: Vec<TagName>,
}

/// Partial thread edit; `None` leaves the field unchanged.
/// A present, non-empty tag list replaces the existing set.
#[derive(Debug, Clone, Default)]
pub struct ThreadPatch {
    pub title: Option<ThreadTitle>,
    pub content: Option<ThreadContent>,
    pub category: Option<String>,
    pub tags: Option<Vec<TagName>>,
}

const THREAD_COLUMNS: &str = r#"
    SELECT
        t.id,
        u.username,
        t.title,
        t.content,
        c.name AS category,
        t.created_at,
        v.net_votes AS votes"#;

const THREAD_SOURCES: &str = r#"
    FROM threads t
    JOIN users u ON u.id = t.user_id
    JOIN categories c ON c.id = t.category_id
    LEFT JOIN LATERAL (
        SELECT COALESCE(SUM(vote), 0)::BIGINT AS net_votes
        FROM votes
        WHERE thread_id = t.id
    ) v ON TRUE"#;

fn select_threads(with_total: bool) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(THREAD_COLUMNS);
    if with_total {
        qb.push(",\n        COUNT(*) OVER() AS total");
    }
    qb.push(THREAD_SOURCES);
    qb
}

/// Append one predicate per present filter. Each binds its own parameter,
/// numbered in the order the predicates appear.
fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &ThreadFilter) {
    qb.push("\n    WHERE TRUE");

    if let Some(category) = &filter.category {
        qb.push(" AND c.name = ").push_bind(category.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (t.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(tag) = &filter.tag {
        qb.push(
            " AND EXISTS (SELECT 1 FROM thread_tags tt JOIN tags tg ON tg.id = tt.tag_id \
             WHERE tt.thread_id = t.id AND tg.name::text ILIKE ",
        )
        .push_bind(contains_pattern(tag))
        .push(")");
    }

    if let Some(author) = &filter.author {
        qb.push(" AND u.username = ").push_bind(author.clone());
    }

    if let Some(saved_by) = &filter.saved_by {
        qb.push(
            " AND EXISTS (SELECT 1 FROM user_threads ut JOIN users su ON su.id = ut.user_id \
             WHERE ut.thread_id = t.id AND su.username = ",
        )
        .push_bind(saved_by.clone())
        .push(")");
    }
}

/// Build the listing query.
pub(crate) fn list_query(filter: &ThreadFilter, page: Pagination) -> QueryBuilder<'static, Postgres> {
    let mut qb = select_threads(true);
    push_filters(&mut qb, filter);

    match filter.sort {
        ThreadSort::Trending => qb.push("\n    ORDER BY votes DESC, t.created_at DESC, t.id DESC"),
        ThreadSort::Recent => qb.push("\n    ORDER BY t.created_at DESC, t.id DESC"),
    };

    qb.push("\n    LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    qb
}

/// Count every thread matching `filter`, for pages past the last row.
pub(crate) fn count_query(filter: &ThreadFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
    SELECT COUNT(*)
    FROM threads t
    JOIN users u ON u.id = t.user_id
    JOIN categories c ON c.id = t.category_id"#,
    );
    push_filters(&mut qb, filter);
    qb
}

/// Thread repository
pub struct ThreadRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ThreadRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a thread and its tag links atomically.
    pub async fn create(&self, author: &str, input: NewThread) -> Result<Thread, DbError> {
        let mut tx = self.pool.begin().await?;

        let category = category_id(&mut tx, &input.category).await?;

        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            INSERT INTO threads (user_id, title, content, category_id)
            SELECT u.id, $2, $3, $4
            FROM users u
            WHERE u.username = $1
            RETURNING id
            "#,
        )
        .bind(author)
        .bind(input.title.as_str())
        .bind(input.content.as_str())
        .bind(category)
        .fetch_optional(&mut *tx)
        .await?;

        let thread_id = row.ok_or_else(|| DbError::not_found("user", author))?.0;
        associate_thread_tags(&mut tx, thread_id, &input.tags).await?;

        tx.commit().await?;
        tracing::debug!(thread_id, author, "thread created");

        self.get(thread_id).await
    }

    /// Get a single thread with tags and net votes.
    pub async fn get(&self, id: i32) -> Result<Thread, DbError> {
        let mut qb = select_threads(false);
        qb.push("\n    WHERE t.id = ").push_bind(id);

        let mut thread: Thread = qb
            .build_query_as::<Thread>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("thread", id))?;

        thread.tags = names_for_threads(self.pool, &[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(thread)
    }

    /// List threads matching `filter`.
    ///
    /// Tags for the whole page are fetched with one batched query.
    pub async fn list(
        &self,
        filter: &ThreadFilter,
        page: Pagination,
    ) -> Result<Paginated<Thread>, DbError> {
        let rows = list_query(filter, page).build().fetch_all(self.pool).await?;

        // The window total rides on the rows, so an empty page past the
        // end needs its own count.
        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None if page.page > 1 => {
                count_query(filter)
                    .build_query_scalar::<i64>()
                    .fetch_one(self.pool)
                    .await?
            }
            None => 0,
        };
        let mut items = rows
            .iter()
            .map(Thread::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i32> = items.iter().map(|t| t.id).collect();
        let mut tags = names_for_threads(self.pool, &ids).await?;
        for thread in &mut items {
            thread.tags = tags.remove(&thread.id).unwrap_or_default();
        }

        Ok(Paginated {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Apply a partial edit if `caller` owns the thread.
    pub async fn update(&self, id: i32, caller: &str, patch: ThreadPatch) -> Result<Thread, DbError> {
        let mut tx = self.pool.begin().await?;

        let owner = lock_owner(&mut tx, id).await?;
        ensure_owner("thread", &owner, caller)?;

        let category = match patch.category.as_deref() {
            Some(name) => Some(category_id(&mut tx, name).await?),
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE threads SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                category_id = COALESCE($4, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.title.as_ref().map(ThreadTitle::as_str))
        .bind(patch.content.as_ref().map(ThreadContent::as_str))
        .bind(category)
        .execute(&mut *tx)
        .await?;

        if let Some(tags) = patch.tags.as_deref().filter(|t| !t.is_empty()) {
            replace_thread_tags(&mut tx, id, tags).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Delete the thread if `caller` owns it. Comments, votes, tag links
    /// and bookmarks cascade.
    pub async fn delete(&self, id: i32, caller: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let owner = lock_owner(&mut tx, id).await?;
        ensure_owner("thread", &owner, caller)?;

        sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Lock the thread row and return its owner's username.
async fn lock_owner(conn: &mut PgConnection, id: i32) -> Result<String, DbError> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT u.username
        FROM threads t
        JOIN users u ON u.id = t.user_id
        WHERE t.id = $1
        FOR UPDATE OF t
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(|r| r.0)
        .ok_or_else(|| DbError::not_found("thread", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &ThreadFilter) -> String {
        list_query(filter, Pagination::default()).sql().to_owned()
    }

    #[test]
    fn unfiltered_query_orders_by_recency() {
        let sql = sql_for(&ThreadFilter::default());
        assert!(sql.contains("ORDER BY t.created_at DESC, t.id DESC"));
        assert!(sql.contains("LIMIT $1 OFFSET $2"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn trending_orders_by_votes_then_recency() {
        let filter = ThreadFilter {
            sort: ThreadSort::Trending,
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("ORDER BY votes DESC, t.created_at DESC, t.id DESC"));
    }

    #[test]
    fn binds_are_numbered_in_predicate_order() {
        let filter = ThreadFilter {
            category: Some("technology".into()),
            search: Some("borrow".into()),
            tag: Some("rust".into()),
            author: Some("alice".into()),
            saved_by: Some("bob".into()),
            sort: ThreadSort::Recent,
        };
        let sql = sql_for(&filter);

        assert!(sql.contains("c.name = $1"));
        assert!(sql.contains("(t.title ILIKE $2 OR t.content ILIKE $3)"));
        assert!(sql.contains("tg.name::text ILIKE $4"));
        assert!(sql.contains("u.username = $5"));
        assert!(sql.contains("su.username = $6"));
        assert!(sql.contains("LIMIT $7 OFFSET $8"));
    }

    #[test]
    fn only_present_predicates_are_emitted() {
        let filter = ThreadFilter {
            author: Some("alice".into()),
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("u.username = $1"));
        assert!(!sql.contains("c.name ="));
        assert!(!sql.contains("user_threads"));
        assert!(sql.contains("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn listing_carries_window_total() {
        assert!(sql_for(&ThreadFilter::default()).contains("COUNT(*) OVER() AS total"));
    }

    #[test]
    fn count_shares_listing_predicates() {
        let filter = ThreadFilter {
            category: Some("technology".into()),
            author: Some("alice".into()),
            sort: ThreadSort::Trending,
            ..Default::default()
        };
        let sql = count_query(&filter).sql().to_owned();

        assert!(sql.contains("SELECT COUNT(*)"));
        assert!(sql.contains("c.name = $1"));
        assert!(sql.contains("u.username = $2"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("LATERAL"));
    }
}
