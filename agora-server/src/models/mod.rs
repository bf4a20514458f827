//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod comment;
pub mod filter;
pub mod pagination;
pub mod tag;
pub mod thread;
pub mod user;
pub mod validation;
pub mod vote;

pub use comment::CommentContent;
pub use filter::{contains_pattern, ThreadFilter, ThreadListParams, ThreadSort};
pub use pagination::{PageParams, Paginated, Pagination};
pub use tag::TagName;
pub use thread::{ThreadContent, ThreadTitle};
pub use user::{Bio, Email, Password, Username};
pub use validation::ValidationError;
pub use vote::VoteValue;
