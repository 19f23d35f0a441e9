//! Response and request bodies
//!
//! Domain values are turned into view models here; handlers never serialize
//! entities directly.

pub mod auth;
pub mod feed;
pub mod post;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use core_kernel::Page;
use domain_blog::{CommentEntry, Group, PostEntry, UserSummary};

use crate::redirect::urls;

/// A post author or commenter
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub username: String,
    pub full_name: String,
    pub url: String,
}

impl From<UserSummary> for AuthorView {
    fn from(user: UserSummary) -> Self {
        Self {
            url: urls::profile(&user.username),
            username: user.username,
            full_name: user.full_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub url: String,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        Self {
            id: *group.id.as_uuid(),
            url: urls::group(&group.slug),
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorView,
    pub group: Option<GroupView>,
    pub image_url: Option<String>,
    pub url: String,
}

impl From<PostEntry> for PostView {
    fn from(entry: PostEntry) -> Self {
        let post = entry.post;
        Self {
            id: *post.id.as_uuid(),
            url: urls::post_detail(post.id),
            image_url: post.image.as_deref().map(urls::media),
            text: post.text,
            pub_date: post.pub_date,
            author: entry.author.into(),
            group: entry.group.map(GroupView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author: AuthorView,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<CommentEntry> for CommentView {
    fn from(entry: CommentEntry) -> Self {
        Self {
            id: *entry.comment.id.as_uuid(),
            author: entry.author.into(),
            text: entry.comment.text,
            created: entry.comment.created,
        }
    }
}

/// One page of a listing with paginator navigation
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

impl<T> PageView<T> {
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        S: Into<T>,
    {
        Self {
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            next_page_number: page.next_page_number(),
            previous_page_number: page.previous_page_number(),
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            items: page.items.into_iter().map(Into::into).collect(),
        }
    }
}
