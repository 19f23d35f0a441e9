//! Blog Domain
//!
//! This crate holds the blogging model: users author posts, optionally file
//! them under a group, comment on each other's posts, and follow authors to
//! build a personal feed.
//!
//! # Feeds
//!
//! ```text
//! index      -> every post
//! group      -> posts of one group
//! profile    -> posts of one author
//! follow     -> posts of every author the viewer follows
//! ```
//!
//! All feeds are newest first and paginated with [`core_kernel::Paginator`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use core_kernel::PageRequest;
//! use domain_blog::{BlogService, InMemoryBlogStore};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let service = BlogService::new(Arc::new(InMemoryBlogStore::new()));
//!     let feed = service.index(PageRequest::first()).await.unwrap();
//!     assert!(feed.page.is_empty());
//! });
//! ```

pub mod user;
pub mod group;
pub mod post;
pub mod comment;
pub mod follow;
pub mod feed;
pub mod forms;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod services;

pub use user::{Actor, NewUser, User, UserSummary};
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostEntry};
pub use comment::{Comment, CommentEntry, NewComment};
pub use follow::{Follow, FollowOutcome, FollowStats};
pub use feed::FeedScope;
pub use forms::{CommentForm, FieldSpec, FormErrors, PostForm, SignupForm};
pub use error::BlogError;
pub use ports::{BlogStore, CommentPort, FollowPort, GroupPort, PostPort, UserPort};
pub use ports::memory::InMemoryBlogStore;
pub use services::{BlogService, EditAccess, EditOutcome, FeedPage, GroupFeed, PostDetail, Profile};
