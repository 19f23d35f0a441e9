//! The directed follow relationship between users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{FollowId, UserId};

use crate::error::BlogError;

/// `user` follows `author`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: FollowId,
    pub user: UserId,
    pub author: UserId,
    pub created: DateTime<Utc>,
}

impl Follow {
    /// Creates a follow, rejecting self-follows
    ///
    /// # Errors
    ///
    /// Returns `BlogError::SelfFollow` when `user` and `author` are the same
    pub fn new(user: UserId, author: UserId) -> Result<Self, BlogError> {
        if user == author {
            return Err(BlogError::SelfFollow);
        }
        Ok(Self {
            id: FollowId::new_v7(),
            user,
            author,
            created: Utc::now(),
        })
    }
}

/// What happened when a user asked to follow an author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    /// Following yourself is silently ignored
    Ignored,
}

/// Follower counts shown on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStats {
    /// Users following this user
    pub followers: u64,
    /// Authors this user follows
    pub following: u64,
}
