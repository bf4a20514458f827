//! HTTP server command
//!
//! Bootstraps the schema, then serves the forum API until Ctrl+C/SIGTERM.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use agora_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use agora_server::{
    bootstrap, create_pool_with_options, run_server, AppState, ServerConfig, TokenService,
    DEFAULT_TOKEN_TTL_MINUTES,
};

use crate::config::resolve_database_url;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Database URL (falls back to DB_USER/DB_PASSWORD/DB_NAME/DB_HOST)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Secret used to sign and verify bearer tokens
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret: String,

    /// Bearer token lifetime in minutes (1 to 525600, one year)
    #[arg(
        long,
        env = "TOKEN_TTL_MINUTES",
        default_value_t = DEFAULT_TOKEN_TTL_MINUTES,
        value_parser = clap::value_parser!(i64).range(1..=525_600)
    )]
    pub token_ttl_minutes: i64,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let tokens = TokenService::new(
        &args.jwt_secret,
        chrono::Duration::minutes(args.token_ttl_minutes),
    )
    .context("Invalid JWT secret")?;

    let config = args.server_config();
    let database_url = resolve_database_url(args.database_url)?;

    let pool = create_pool_with_options(&database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    bootstrap(&pool)
        .await
        .context("Failed to bootstrap schema")?;

    tracing::info!(
        bind = %config.bind_addr,
        token_ttl_minutes = args.token_ttl_minutes,
        "Starting agora server"
    );

    // Blocks until shutdown
    run_server(AppState::new(pool, tokens), config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_server_config() {
        let args = ServeArgs::try_parse_from([
            "serve",
            "--jwt-secret",
            "s3cret",
            "--bind",
            "0.0.0.0",
            "--port",
            "9000",
            "--timeout",
            "5",
        ])
        .unwrap();

        let config = args.server_config();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.cors_permissive);
    }

    #[test]
    fn token_ttl_must_be_positive_and_bounded() {
        for bad in ["0", "-5", "600000"] {
            let flag = format!("--token-ttl-minutes={bad}");
            let parsed = ServeArgs::try_parse_from(["serve", "--jwt-secret", "s3cret", &flag]);
            assert!(parsed.is_err(), "{bad} should be rejected");
        }

        let args = ServeArgs::try_parse_from([
            "serve",
            "--jwt-secret",
            "s3cret",
            "--token-ttl-minutes",
            "60",
        ])
        .unwrap();
        assert_eq!(args.token_ttl_minutes, 60);
    }
}
