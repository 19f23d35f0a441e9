//! Feed pages

use serde::Serialize;

use domain_blog::{FeedPage, GroupFeed, Profile};

use super::{AuthorView, GroupView, PageView, PostView};

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub title: String,
    pub page: PageView<PostView>,
}

impl From<FeedPage> for FeedResponse {
    fn from(feed: FeedPage) -> Self {
        Self {
            title: feed.title,
            page: PageView::from_page(feed.page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupFeedResponse {
    pub title: String,
    pub group: GroupView,
    pub page: PageView<PostView>,
}

impl From<GroupFeed> for GroupFeedResponse {
    fn from(feed: GroupFeed) -> Self {
        Self {
            title: feed.title,
            group: feed.group.into(),
            page: PageView::from_page(feed.page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub title: String,
    pub author: AuthorView,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// Whether the viewer follows this author
    pub following: bool,
    pub page: PageView<PostView>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            title: profile.title,
            author: profile.author.into(),
            posts_count: profile.posts_count,
            followers_count: profile.follow_stats.followers,
            following_count: profile.follow_stats.following,
            following: profile.following,
            page: PageView::from_page(profile.page),
        }
    }
}

/// Static "about" pages
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub title: &'static str,
    pub text: &'static str,
}
