//! Repository implementations for blog entities
//!
//! Each repository owns the SQL for one table and returns plain row types;
//! the adapter layer maps rows onto domain types.

pub mod users;
pub mod groups;
pub mod posts;
pub mod comments;
pub mod follows;

pub use users::{UserRepository, UserRow};
pub use groups::{GroupRepository, GroupRow};
pub use posts::{PostFilter, PostEntryRow, PostRepository, PostRow};
pub use comments::{CommentEntryRow, CommentRepository, CommentRow};
pub use follows::{FollowRepository, FollowRow};
