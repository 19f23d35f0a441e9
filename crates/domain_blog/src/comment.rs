//! Comments attached to posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CommentId, PostId, UserId};

use crate::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post: PostId,
    pub author: UserId,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A comment with its author, as listed under a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: UserSummary,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post: PostId,
    pub author: UserId,
    pub text: String,
}

impl NewComment {
    pub fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::new_v7(),
            post: self.post,
            author: self.author,
            text: self.text,
            created: Utc::now(),
        }
    }
}
