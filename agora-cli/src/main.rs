//! agora CLI - runs the forum API server
//!
//! Subcommands:
//! - `serve`: bootstrap the schema and serve HTTP until shutdown
//! - `migrate`: bootstrap the schema and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "agora",
    author,
    version,
    about = "Discussion forum API server",
    long_about = "Serve the agora forum API: accounts and bearer-token login, threads with \
                  categories and tags, comments, votes and saved threads, backed by PostgreSQL."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create tables and seed data, then exit
    Migrate(commands::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    if env_files.is_empty() {
        tracing::debug!("No .env files found (current dir or ~/.agora)");
    }
    for path in &env_files {
        tracing::debug!("Loaded .env from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
