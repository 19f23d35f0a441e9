//! Blog Domain Ports
//!
//! This module defines the port interfaces the blog domain needs from its
//! data source, enabling swappable implementations.
//!
//! # Architecture
//!
//! Each entity gets a narrow port trait; [`BlogStore`] bundles them so the
//! application can hold a single `Arc<dyn BlogStore>`:
//!
//! - **PostgreSQL Adapter**: `infra_db::PostgresBlogStore`
//! - **In-memory Adapter**: [`memory::InMemoryBlogStore`], used for tests and
//!   for running the server without a database
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_blog::ports::{BlogStore, memory::InMemoryBlogStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BlogStore> = Arc::new(InMemoryBlogStore::new());
//! let service = BlogService::new(store);
//! ```

use async_trait::async_trait;

use core_kernel::{
    DomainPort, GroupId, HealthCheckable, Page, PageRequest, Paginator, PortError, PostId, UserId,
};

use crate::comment::{Comment, CommentEntry, NewComment};
use crate::feed::FeedScope;
use crate::follow::{Follow, FollowStats};
use crate::group::{Group, NewGroup};
use crate::post::{NewPost, Post, PostChanges, PostEntry};
use crate::user::{NewUser, User};

/// Account storage
#[async_trait]
pub trait UserPort: DomainPort {
    /// Retrieves a user by ID, or `PortError::NotFound`
    async fn get_user(&self, id: UserId) -> Result<User, PortError>;

    /// Looks a user up by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError>;

    /// Registers a user
    ///
    /// Returns `PortError::Conflict` if the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User, PortError>;
}

/// Group storage
#[async_trait]
pub trait GroupPort: DomainPort {
    /// Retrieves a group by ID, or `PortError::NotFound`
    async fn get_group(&self, id: GroupId) -> Result<Group, PortError>;

    /// Looks a group up by slug
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>, PortError>;

    /// Lists all groups ordered by title
    async fn list_groups(&self) -> Result<Vec<Group>, PortError>;

    /// Creates a group
    ///
    /// Returns `PortError::Conflict` if the slug is taken
    async fn create_group(&self, group: NewGroup) -> Result<Group, PortError>;
}

/// Post storage and feed queries
#[async_trait]
pub trait PostPort: DomainPort {
    /// Retrieves a post with its author and group, or `PortError::NotFound`
    async fn get_post(&self, id: PostId) -> Result<PostEntry, PortError>;

    /// Returns one page of the feed, newest posts first
    ///
    /// # Arguments
    ///
    /// * `scope` - Which posts qualify
    /// * `paginator` - Page size
    /// * `page` - Requested page, resolved against the feed size
    async fn list_posts(
        &self,
        scope: FeedScope,
        paginator: Paginator,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, PortError>;

    /// Number of posts in a feed
    async fn count_posts(&self, scope: FeedScope) -> Result<u64, PortError>;

    /// Publishes a post
    async fn create_post(&self, post: NewPost) -> Result<Post, PortError>;

    /// Applies an edit, or `PortError::NotFound`
    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Post, PortError>;

    /// Deletes a post and its comments
    async fn delete_post(&self, id: PostId) -> Result<(), PortError>;
}

/// Comment storage
#[async_trait]
pub trait CommentPort: DomainPort {
    /// Stores a comment
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, PortError>;

    /// Lists the comments of a post, oldest first
    async fn list_comments(&self, post: PostId) -> Result<Vec<CommentEntry>, PortError>;
}

/// Follow relationship storage
#[async_trait]
pub trait FollowPort: DomainPort {
    /// Stores the follow unless the pair already exists
    ///
    /// # Returns
    ///
    /// `true` if a new follow was created
    async fn follow(&self, follow: Follow) -> Result<bool, PortError>;

    /// Removes the follow if present
    ///
    /// # Returns
    ///
    /// `true` if a follow was removed
    async fn unfollow(&self, user: UserId, author: UserId) -> Result<bool, PortError>;

    /// Whether `user` follows `author`
    async fn is_following(&self, user: UserId, author: UserId) -> Result<bool, PortError>;

    /// Follower and following counts of a user
    async fn follow_stats(&self, user: UserId) -> Result<FollowStats, PortError>;
}

/// Everything the blog needs from a backing store
pub trait BlogStore:
    UserPort + GroupPort + PostPort + CommentPort + FollowPort + HealthCheckable
{
}

impl<T> BlogStore for T where
    T: UserPort + GroupPort + PostPort + CommentPort + FollowPort + HealthCheckable
{
}

/// In-memory store
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    use crate::user::UserSummary;

    #[derive(Debug, Default)]
    struct State {
        users: HashMap<UserId, User>,
        groups: HashMap<GroupId, Group>,
        /// Kept in insertion order; feeds sort a copy
        posts: Vec<Post>,
        comments: Vec<Comment>,
        follows: Vec<Follow>,
    }

    impl State {
        fn summary(&self, id: UserId) -> Result<UserSummary, PortError> {
            self.users
                .get(&id)
                .map(User::summary)
                .ok_or_else(|| PortError::not_found("User", id))
        }

        fn entry(&self, post: &Post) -> Result<PostEntry, PortError> {
            Ok(PostEntry {
                post: post.clone(),
                author: self.summary(post.author)?,
                group: post.group.and_then(|g| self.groups.get(&g).cloned()),
            })
        }

        fn followed_by(&self, user: UserId) -> Vec<UserId> {
            self.follows
                .iter()
                .filter(|f| f.user == user)
                .map(|f| f.author)
                .collect()
        }

        /// Posts in the scope, newest first; later insertions win ties
        fn feed(&self, scope: FeedScope) -> Vec<&Post> {
            let followed = match scope {
                FeedScope::Following(user) => self.followed_by(user),
                _ => Vec::new(),
            };
            let mut posts: Vec<&Post> = self
                .posts
                .iter()
                .rev()
                .filter(|p| scope.admits(p, &followed))
                .collect();
            posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
            posts
        }
    }

    /// Blog store backed by process memory
    #[derive(Debug, Default)]
    pub struct InMemoryBlogStore {
        state: RwLock<State>,
    }

    impl InMemoryBlogStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryBlogStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryBlogStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "memory-blog-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl UserPort for InMemoryBlogStore {
        async fn get_user(&self, id: UserId) -> Result<User, PortError> {
            self.state
                .read()
                .await
                .users
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", id))
        }

        async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn create_user(&self, user: NewUser) -> Result<User, PortError> {
            let mut state = self.state.write().await;
            if state.users.values().any(|u| u.username == user.username) {
                return Err(PortError::conflict(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            let user = user.into_user();
            state.users.insert(user.id, user.clone());
            Ok(user)
        }
    }

    #[async_trait]
    impl GroupPort for InMemoryBlogStore {
        async fn get_group(&self, id: GroupId) -> Result<Group, PortError> {
            self.state
                .read()
                .await
                .groups
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Group", id))
        }

        async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .groups
                .values()
                .find(|g| g.slug == slug)
                .cloned())
        }

        async fn list_groups(&self) -> Result<Vec<Group>, PortError> {
            let mut groups: Vec<Group> =
                self.state.read().await.groups.values().cloned().collect();
            groups.sort_by(|a, b| a.title.cmp(&b.title));
            Ok(groups)
        }

        async fn create_group(&self, group: NewGroup) -> Result<Group, PortError> {
            let mut state = self.state.write().await;
            if state.groups.values().any(|g| g.slug == group.slug) {
                return Err(PortError::conflict(format!(
                    "group slug '{}' already exists",
                    group.slug
                )));
            }
            let group = group.into_group();
            state.groups.insert(group.id, group.clone());
            Ok(group)
        }
    }

    #[async_trait]
    impl PostPort for InMemoryBlogStore {
        async fn get_post(&self, id: PostId) -> Result<PostEntry, PortError> {
            let state = self.state.read().await;
            let post = state
                .posts
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| PortError::not_found("Post", id))?;
            state.entry(post)
        }

        async fn list_posts(
            &self,
            scope: FeedScope,
            paginator: Paginator,
            page: PageRequest,
        ) -> Result<Page<PostEntry>, PortError> {
            let state = self.state.read().await;
            let entries = state
                .feed(scope)
                .into_iter()
                .map(|p| state.entry(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::from_slice(entries, paginator, page))
        }

        async fn count_posts(&self, scope: FeedScope) -> Result<u64, PortError> {
            Ok(self.state.read().await.feed(scope).len() as u64)
        }

        async fn create_post(&self, post: NewPost) -> Result<Post, PortError> {
            let mut state = self.state.write().await;
            if !state.users.contains_key(&post.author) {
                return Err(PortError::not_found("User", post.author));
            }
            if let Some(group) = post.group {
                if !state.groups.contains_key(&group) {
                    return Err(PortError::not_found("Group", group));
                }
            }
            let post = post.into_post();
            state.posts.push(post.clone());
            Ok(post)
        }

        async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Post, PortError> {
            let mut state = self.state.write().await;
            if let Some(group) = changes.group {
                if !state.groups.contains_key(&group) {
                    return Err(PortError::not_found("Group", group));
                }
            }
            let post = state
                .posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| PortError::not_found("Post", id))?;
            changes.apply(post);
            Ok(post.clone())
        }

        async fn delete_post(&self, id: PostId) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            state.posts.retain(|p| p.id != id);
            state.comments.retain(|c| c.post != id);
            Ok(())
        }
    }

    #[async_trait]
    impl CommentPort for InMemoryBlogStore {
        async fn add_comment(&self, comment: NewComment) -> Result<Comment, PortError> {
            let mut state = self.state.write().await;
            if !state.posts.iter().any(|p| p.id == comment.post) {
                return Err(PortError::not_found("Post", comment.post));
            }
            let comment = comment.into_comment();
            state.comments.push(comment.clone());
            Ok(comment)
        }

        async fn list_comments(&self, post: PostId) -> Result<Vec<CommentEntry>, PortError> {
            let state = self.state.read().await;
            state
                .comments
                .iter()
                .filter(|c| c.post == post)
                .map(|c| {
                    Ok(CommentEntry {
                        comment: c.clone(),
                        author: state.summary(c.author)?,
                    })
                })
                .collect()
        }
    }

    #[async_trait]
    impl FollowPort for InMemoryBlogStore {
        async fn follow(&self, follow: Follow) -> Result<bool, PortError> {
            let mut state = self.state.write().await;
            if state
                .follows
                .iter()
                .any(|f| f.user == follow.user && f.author == follow.author)
            {
                return Ok(false);
            }
            state.follows.push(follow);
            Ok(true)
        }

        async fn unfollow(&self, user: UserId, author: UserId) -> Result<bool, PortError> {
            let mut state = self.state.write().await;
            let before = state.follows.len();
            state.follows.retain(|f| !(f.user == user && f.author == author));
            Ok(state.follows.len() != before)
        }

        async fn is_following(&self, user: UserId, author: UserId) -> Result<bool, PortError> {
            Ok(self
                .state
                .read()
                .await
                .follows
                .iter()
                .any(|f| f.user == user && f.author == author))
        }

        async fn follow_stats(&self, user: UserId) -> Result<FollowStats, PortError> {
            let state = self.state.read().await;
            Ok(FollowStats {
                followers: state.follows.iter().filter(|f| f.author == user).count() as u64,
                following: state.follows.iter().filter(|f| f.user == user).count() as u64,
            })
        }
    }
}
