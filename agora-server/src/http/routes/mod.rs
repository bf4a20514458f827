//! Route handlers organized by resource

pub mod categories;
pub mod comments;
pub mod health;
pub mod saved;
pub mod threads;
pub mod users;
pub mod votes;
