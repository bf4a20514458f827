//! Create tables and seed rows without starting the server.

use anyhow::{Context, Result};
use clap::Parser;

use agora_server::{bootstrap, create_pool};

use crate::config::resolve_database_url;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (falls back to DB_USER/DB_PASSWORD/DB_NAME/DB_HOST)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    bootstrap(&pool)
        .await
        .context("Failed to bootstrap schema")?;

    tracing::info!("Schema and seed data are up to date");
    Ok(())
}
