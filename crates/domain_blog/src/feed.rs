//! Feed scopes
//!
//! Every listing in the system is a reverse-chronological, paginated slice of
//! posts. The scope decides which posts qualify.

use serde::{Deserialize, Serialize};

use core_kernel::{GroupId, UserId};

use crate::post::Post;

/// Which posts a feed contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum FeedScope {
    /// Every post on the site
    All,
    /// Posts assigned to one group
    Group(GroupId),
    /// Posts written by one author
    Author(UserId),
    /// Posts by every author the given user follows
    Following(UserId),
}

impl FeedScope {
    /// Checks a post against every scope that can be decided from the post alone
    ///
    /// `Following` needs the follow set and is resolved by the store, so
    /// it is passed the authors being followed.
    pub fn admits(&self, post: &Post, followed: &[UserId]) -> bool {
        match self {
            FeedScope::All => true,
            FeedScope::Group(group) => post.group == Some(*group),
            FeedScope::Author(author) => post.author == *author,
            FeedScope::Following(_) => followed.contains(&post.author),
        }
    }
}

/// Page titles of the feeds
pub mod titles {
    pub const INDEX: &str = "Latest updates on the site";
    pub const FOLLOW: &str = "My subscriptions";

    pub fn group(slug: &str) -> String {
        format!("Posts of community {}", slug)
    }

    pub fn profile(username: &str) -> String {
        format!("Posts by {}", username)
    }
}
