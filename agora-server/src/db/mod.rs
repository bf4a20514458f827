//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool passed explicitly, no global handle
//! - List operations batch their lookups, no N+1 queries
//! - Rely on DB constraints and ON CONFLICT, no check-then-insert
//! - Transactions for multi-step operations

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, database_url_from_parts};
pub use repos::*;
pub use schema::bootstrap;
