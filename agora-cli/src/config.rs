//! Environment loading
//!
//! `.env` files are read before argument parsing so clap's `env` fallbacks
//! see their values. Variables already set in the process are never
//! overwritten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use agora_server::database_url_from_parts;

/// Per-user config directory (`~/.agora`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".agora"))
}

/// Load `.env` from the current directory, then `~/.agora/.env`.
///
/// Returns the files that were loaded. Runs before tracing is set up, so
/// the caller logs the result.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    // Current directory first (highest priority)
    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    loaded
}

/// Pick the connection string: explicit flag or `DATABASE_URL`, else one
/// composed from the `DB_*` variables.
pub fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    explicit
        .filter(|url| !url.is_empty())
        .or_else(|| database_url_from_parts(|key| std::env::var(key).ok()))
        .context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL, \
             DB_USER/DB_PASSWORD/DB_NAME, or ~/.agora/.env",
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_dotenv_doesnt_panic() {
        // Should never panic, even if no .env exists
        let _ = load_dotenv();
    }

    #[test]
    fn explicit_url_wins() {
        let url = resolve_database_url(Some("postgres://db/agora".into())).unwrap();
        assert_eq!(url, "postgres://db/agora");
    }

    #[test]
    fn config_dir_is_under_home() {
        if let Some(dir) = config_dir() {
            assert!(dir.ends_with(".agora"));
        }
    }
}
