//! Posts and their feed representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{GroupId, PostId, UserId};

use crate::group::Group;
use crate::user::UserSummary;

/// A user-authored text entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: UserId,
    pub group: Option<GroupId>,
    /// Media-relative path of the attached image
    pub image: Option<String>,
}

impl Post {
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }
}

/// A post together with the author and group it is shown with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: UserSummary,
    pub group: Option<Group>,
}

impl PostEntry {
    pub fn id(&self) -> PostId {
        self.post.id
    }
}

/// Data required to publish a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: UserId,
    pub text: String,
    pub group: Option<GroupId>,
    pub image: Option<String>,
}

impl NewPost {
    pub fn into_post(self) -> Post {
        Post {
            id: PostId::new_v7(),
            text: self.text,
            pub_date: Utc::now(),
            author: self.author,
            group: self.group,
            image: self.image,
        }
    }
}

/// Changes applied when an author edits a post
///
/// `group` replaces the current group (None detaches the post); the image is
/// only replaced when a new one was uploaded.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group: Option<GroupId>,
    pub image: Option<String>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        post.text = self.text;
        post.group = self.group;
        if let Some(image) = self.image {
            post.image = Some(image);
        }
    }
}
