//! Category repository

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use super::DbError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(categories)
    }
}

/// Resolve a category name inside an open transaction.
pub(crate) async fn category_id(conn: &mut PgConnection, name: &str) -> Result<i32, DbError> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await?;

    row.map(|r| r.0).ok_or_else(|| DbError::UnknownReference {
        resource: "category",
        name: name.to_owned(),
    })
}
