//! agora-server: HTTP API for a discussion forum
//!
//! Users sign up and log in for a bearer token, then post threads into
//! categories, tag them, comment, vote and bookmark. State lives in
//! PostgreSQL; every request is handled statelessly over a shared pool.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use auth::{TokenService, DEFAULT_TOKEN_TTL_MINUTES};
pub use db::{bootstrap, create_pool, create_pool_with_options, database_url_from_parts, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
