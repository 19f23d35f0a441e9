//! Core Kernel - Foundational types shared by every crate of the blog platform
//!
//! This crate provides the fundamental building blocks used across all modules:
//! - Strongly-typed identifiers for users, groups, posts, comments and follows
//! - Page-number pagination shared by every feed
//! - Port error and health types for the ports-and-adapters boundary

pub mod identifiers;
pub mod pagination;
pub mod ports;
pub mod error;

pub use identifiers::{UserId, GroupId, PostId, CommentId, FollowId};
pub use pagination::{Page, PageRequest, PageWindow, Paginator, POSTS_PER_PAGE};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
