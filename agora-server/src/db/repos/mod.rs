//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Batched lookups for list operations (no N+1)
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions with row locks for ownership-gated mutations

pub mod categories;
pub mod comments;
pub mod saved;
pub mod tags;
pub mod threads;
pub mod users;
pub mod votes;

pub use categories::{Category, CategoryRepo};
pub use comments::{Comment, CommentRepo};
pub use saved::SavedThreadRepo;
pub use tags::TagRepo;
pub use threads::{NewThread, Thread, ThreadPatch, ThreadRepo};
pub use users::{NewUser, User, UserPatch, UserRepo};
pub use votes::{Vote, VoteRepo};

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} belongs to another user")]
    Forbidden { resource: &'static str },

    #[error("{field} already taken")]
    Conflict { field: &'static str },

    #[error("{resource} '{name}' does not exist")]
    UnknownReference { resource: &'static str, name: String },

    #[error("seeding failed: {0}")]
    Seed(String),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Gate a mutation on the row's owner.
pub(crate) fn ensure_owner(
    resource: &'static str,
    owner: &str,
    caller: &str,
) -> Result<(), DbError> {
    if owner == caller {
        Ok(())
    } else {
        Err(DbError::Forbidden { resource })
    }
}

/// Name of the violated constraint if `err` is a unique violation.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(db_err.constraint().unwrap_or_default().to_owned()),
        _ => None,
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| matches!(e.kind(), ErrorKind::ForeignKeyViolation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_check() {
        assert!(ensure_owner("thread", "alice", "alice").is_ok());
        assert!(matches!(
            ensure_owner("thread", "alice", "mallory"),
            Err(DbError::Forbidden { resource: "thread" })
        ));
    }

    #[test]
    fn owner_check_is_case_sensitive() {
        assert!(ensure_owner("comment", "alice", "Alice").is_err());
    }

    #[test]
    fn non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(unique_violation(&err).is_none());
        assert!(!is_foreign_key_violation(&err));
    }
}
