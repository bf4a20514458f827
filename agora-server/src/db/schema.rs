//! Schema bootstrap
//!
//! Runs at startup. Every statement is idempotent: tables and indexes use
//! `IF NOT EXISTS`, seed rows use `ON CONFLICT DO NOTHING`.

use sqlx::PgPool;

use super::repos::DbError;
use crate::auth::hash_password;

/// Topic categories every installation starts with.
pub const SEED_CATEGORIES: &[&str] = &[
    "general",
    "technology",
    "science",
    "gaming",
    "movies",
    "music",
    "sports",
    "books",
    "art",
    "travel",
    "food",
    "academics",
];

/// Reserved accounts: (id, username, initial password, email).
/// Id 1 ("left") owns content of departed users.
const RESERVED_USERS: &[(i32, &str, &str, &str)] = &[
    (1, "left", "leftpass123", "deleted@example.com"),
    (2, "admin", "adminpass123", "admin@example.com"),
    (3, "guest", "guestpass123", "guest@example.com"),
];

const TABLES: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS citext",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(50) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE,
        bio VARCHAR(500) DEFAULT 'This user is too cool to add a bio.',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS threads (
        id SERIAL PRIMARY KEY,
        user_id INT NOT NULL REFERENCES users(id),
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        category_id INT NOT NULL REFERENCES categories(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS votes (
        id SERIAL PRIMARY KEY,
        thread_id INT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        vote SMALLINT NOT NULL CHECK (vote IN (-1, 1)),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (thread_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id SERIAL PRIMARY KEY,
        thread_id INT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id SERIAL PRIMARY KEY,
        name CITEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS thread_tags (
        thread_id INT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
        tag_id INT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (thread_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_threads (
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        thread_id INT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, thread_id)
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_threads_created ON threads(created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_threads_user ON threads(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_threads_category ON threads(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_votes_thread ON votes(thread_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_thread ON comments(thread_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_thread_tags_tag ON thread_tags(tag_id)",
];

/// Create tables, indexes and seed rows.
pub async fn bootstrap(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Bootstrapping forum schema...");

    for statement in TABLES.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }

    seed_reserved_users(pool).await?;
    seed_categories(pool).await?;

    tracing::info!("Forum schema ready");
    Ok(())
}

async fn seed_reserved_users(pool: &PgPool) -> Result<(), DbError> {
    for &(id, username, password, email) in RESERVED_USERS {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        if exists.0 {
            continue;
        }

        let hash = hash_password(password).map_err(|e| DbError::Seed(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(&hash)
        .bind(email)
        .execute(pool)
        .await?;
        tracing::info!(id, username, "seeded reserved user");
    }

    // Explicit ids above do not advance the SERIAL sequence.
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('users', 'id'), GREATEST((SELECT MAX(id) FROM users), 1))",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO categories (name)
        SELECT UNNEST($1::text[])
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(SEED_CATEGORIES)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ids_are_first_three() {
        let ids: Vec<i32> = RESERVED_USERS.iter().map(|u| u.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn seed_categories_are_unique() {
        let mut names = SEED_CATEGORIES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SEED_CATEGORIES.len());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bootstrap_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = super::super::create_pool(&url).await.expect("pool");

        bootstrap(&pool).await.expect("first run");
        bootstrap(&pool).await.expect("second run");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(count.0 >= SEED_CATEGORIES.len() as i64);
    }
}
