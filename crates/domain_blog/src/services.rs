//! Blog use cases
//!
//! `BlogService` orchestrates the ports to serve each page and write action
//! of the site. Handlers stay thin: they translate HTTP into these calls and
//! the outcomes back into responses or redirects.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use core_kernel::{Page, PageRequest, Paginator, PortError, PostId};

use crate::comment::{Comment, CommentEntry, NewComment};
use crate::credentials::{hash_password, verify_password};
use crate::error::BlogError;
use crate::feed::{titles, FeedScope};
use crate::follow::{Follow, FollowOutcome, FollowStats};
use crate::forms::{CommentForm, FormErrors, PostForm, SignupForm, INVALID_CHOICE, USERNAME_TAKEN};
use crate::group::Group;
use crate::post::{NewPost, Post, PostChanges, PostEntry};
use crate::ports::{BlogStore, CommentPort, FollowPort, GroupPort, PostPort, UserPort};
use crate::user::{Actor, NewUser, User, UserSummary};

/// A titled page of posts
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub title: String,
    pub page: Page<PostEntry>,
}

/// The feed of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupFeed {
    pub group: Group,
    pub title: String,
    pub page: Page<PostEntry>,
}

/// An author's profile with their posts
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub author: UserSummary,
    pub title: String,
    pub page: Page<PostEntry>,
    /// Whether the viewer follows this author (false for guests)
    pub following: bool,
    pub posts_count: u64,
    pub follow_stats: FollowStats,
}

/// A single post with its discussion
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub entry: PostEntry,
    pub comments: Vec<CommentEntry>,
    /// Number of posts written by the post's author
    pub author_posts_count: u64,
}

/// Whether the actor may edit a post
#[derive(Debug, Clone)]
pub enum EditAccess {
    /// The actor wrote the post
    Granted(PostEntry),
    /// Someone else wrote the post
    NotAuthor,
}

/// Result of submitting the edit form
#[derive(Debug, Clone)]
pub enum EditOutcome {
    Updated(Post),
    NotAuthor,
}

/// Application service over a blog store
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn BlogStore>,
    paginator: Paginator,
}

impl BlogService {
    /// Creates a service using the default page size
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self {
            store,
            paginator: Paginator::default(),
        }
    }

    /// Overrides the page size
    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub fn store(&self) -> &Arc<dyn BlogStore> {
        &self.store
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    // ========================================================================
    // Feeds
    // ========================================================================

    /// Site-wide feed
    pub async fn index(&self, page: PageRequest) -> Result<FeedPage, BlogError> {
        let page = self.store.list_posts(FeedScope::All, self.paginator, page).await?;
        Ok(FeedPage {
            title: titles::INDEX.to_string(),
            page,
        })
    }

    /// Feed of the group with the given slug
    pub async fn group_feed(&self, slug: &str, page: PageRequest) -> Result<GroupFeed, BlogError> {
        let group = self
            .store
            .find_group_by_slug(slug)
            .await?
            .ok_or_else(|| BlogError::not_found("Group", slug))?;
        let page = self
            .store
            .list_posts(FeedScope::Group(group.id), self.paginator, page)
            .await?;

        Ok(GroupFeed {
            title: titles::group(&group.slug),
            group,
            page,
        })
    }

    /// Profile page of an author as seen by `viewer`
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<&Actor>,
        page: PageRequest,
    ) -> Result<Profile, BlogError> {
        let author = self.require_user(username).await?;
        let scope = FeedScope::Author(author.id);
        let page = self.store.list_posts(scope, self.paginator, page).await?;

        let following = match viewer {
            Some(viewer) => self.store.is_following(viewer.id, author.id).await?,
            None => false,
        };
        let posts_count = page.total;
        let follow_stats = self.store.follow_stats(author.id).await?;

        Ok(Profile {
            title: titles::profile(&author.username),
            author: author.summary(),
            page,
            following,
            posts_count,
            follow_stats,
        })
    }

    /// Posts by every author the actor follows
    pub async fn follow_feed(&self, actor: &Actor, page: PageRequest) -> Result<FeedPage, BlogError> {
        let page = self
            .store
            .list_posts(FeedScope::Following(actor.id), self.paginator, page)
            .await?;
        Ok(FeedPage {
            title: titles::FOLLOW.to_string(),
            page,
        })
    }

    /// A post with its comments
    pub async fn post_detail(&self, id: PostId) -> Result<PostDetail, BlogError> {
        let entry = self.require_post(id).await?;
        let comments = self.store.list_comments(id).await?;
        let author_posts_count = self
            .store
            .count_posts(FeedScope::Author(entry.post.author))
            .await?;

        Ok(PostDetail {
            entry,
            comments,
            author_posts_count,
        })
    }

    // ========================================================================
    // Authoring
    // ========================================================================

    /// Groups offered by the post form
    pub async fn group_choices(&self) -> Result<Vec<Group>, BlogError> {
        Ok(self.store.list_groups().await?)
    }

    /// Publishes a post written by the actor
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Form` when the form is invalid or names an unknown group
    #[instrument(skip(self, form, image), fields(author = %actor.username))]
    pub async fn create_post(
        &self,
        actor: &Actor,
        form: PostForm,
        image: Option<String>,
    ) -> Result<Post, BlogError> {
        let form = self.clean_post_form(form).await?;
        let post = self
            .store
            .create_post(NewPost {
                author: actor.id,
                text: form.text,
                group: form.group,
                image,
            })
            .await?;

        info!(post_id = %post.id, "Post published");
        Ok(post)
    }

    /// Checks whether the actor may open the edit form of a post
    pub async fn edit_access(&self, actor: &Actor, id: PostId) -> Result<EditAccess, BlogError> {
        let entry = self.require_post(id).await?;
        if entry.post.is_authored_by(actor.id) {
            Ok(EditAccess::Granted(entry))
        } else {
            Ok(EditAccess::NotAuthor)
        }
    }

    /// Applies the edit form; only the author may change a post
    #[instrument(skip(self, form, image), fields(editor = %actor.username))]
    pub async fn edit_post(
        &self,
        actor: &Actor,
        id: PostId,
        form: PostForm,
        image: Option<String>,
    ) -> Result<EditOutcome, BlogError> {
        let entry = self.require_post(id).await?;
        if !entry.post.is_authored_by(actor.id) {
            debug!(post_id = %id, "Edit refused for non-author");
            return Ok(EditOutcome::NotAuthor);
        }

        let form = self.clean_post_form(form).await?;
        let post = self
            .store
            .update_post(
                id,
                PostChanges {
                    text: form.text,
                    group: form.group,
                    image,
                },
            )
            .await?;

        info!(post_id = %post.id, "Post updated");
        Ok(EditOutcome::Updated(post))
    }

    /// Deletes a post written by the actor
    ///
    /// # Returns
    ///
    /// `false` when the actor is not the author and nothing was deleted
    pub async fn delete_post(&self, actor: &Actor, id: PostId) -> Result<bool, BlogError> {
        let entry = self.require_post(id).await?;
        if !entry.post.is_authored_by(actor.id) {
            return Ok(false);
        }
        self.store.delete_post(id).await?;
        info!(post_id = %id, "Post deleted");
        Ok(true)
    }

    /// Adds a comment to a post
    ///
    /// An invalid comment is dropped without error; the caller returns to the
    /// post either way.
    ///
    /// # Returns
    ///
    /// The stored comment, or `None` if the form was invalid
    pub async fn add_comment(
        &self,
        actor: &Actor,
        post: PostId,
        form: CommentForm,
    ) -> Result<Option<Comment>, BlogError> {
        self.require_post(post).await?;

        let form = match form.clean() {
            Ok(form) => form,
            Err(errors) => {
                debug!(post_id = %post, %errors, "Comment discarded");
                return Ok(None);
            }
        };

        let comment = self
            .store
            .add_comment(NewComment {
                post,
                author: actor.id,
                text: form.text,
            })
            .await?;

        Ok(Some(comment))
    }

    // ========================================================================
    // Following
    // ========================================================================

    /// Follows the author with the given username
    ///
    /// Following yourself is ignored; following twice keeps a single follow.
    #[instrument(skip(self), fields(user = %actor.username))]
    pub async fn follow(&self, actor: &Actor, username: &str) -> Result<FollowOutcome, BlogError> {
        let author = self.require_user(username).await?;

        let follow = match Follow::new(actor.id, author.id) {
            Ok(follow) => follow,
            Err(BlogError::SelfFollow) => return Ok(FollowOutcome::Ignored),
            Err(e) => return Err(e),
        };

        if self.store.follow(follow).await? {
            info!(author = %author.username, "Follow created");
            Ok(FollowOutcome::Created)
        } else {
            Ok(FollowOutcome::AlreadyFollowing)
        }
    }

    /// Stops following the author with the given username, if followed
    ///
    /// # Returns
    ///
    /// `true` if a follow was removed
    #[instrument(skip(self), fields(user = %actor.username))]
    pub async fn unfollow(&self, actor: &Actor, username: &str) -> Result<bool, BlogError> {
        let Some(author) = self.store.find_user_by_username(username).await? else {
            return Ok(false);
        };
        let removed = self.store.unfollow(actor.id, author.id).await?;
        if removed {
            info!(author = %author.username, "Follow removed");
        }
        Ok(removed)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Registers an account
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Form` for invalid input or a taken username
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn signup(&self, form: SignupForm) -> Result<User, BlogError> {
        let form = form.clean()?;

        if self.store.find_user_by_username(&form.username).await?.is_some() {
            return Err(FormErrors::single("username", USERNAME_TAKEN).into());
        }

        let password_hash = hash_password(&form.password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: form.username,
                first_name: form.first_name.unwrap_or_default(),
                last_name: form.last_name.unwrap_or_default(),
                email: form.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                PortError::Conflict { .. } => FormErrors::single("username", USERNAME_TAKEN).into(),
                other => BlogError::from(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, BlogError> {
        let user = self
            .store
            .find_user_by_username(username.trim())
            .await?
            .ok_or(BlogError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(BlogError::InvalidCredentials)
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn require_user(&self, username: &str) -> Result<User, BlogError> {
        self.store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| BlogError::not_found("User", username))
    }

    async fn require_post(&self, id: PostId) -> Result<PostEntry, BlogError> {
        self.store.get_post(id).await.map_err(|e| {
            if e.is_not_found() {
                BlogError::not_found("Post", id)
            } else {
                BlogError::from(e)
            }
        })
    }

    async fn clean_post_form(&self, form: PostForm) -> Result<PostForm, BlogError> {
        let group = form.group;
        let cleaned = form.clean();
        let mut errors = cleaned.as_ref().err().cloned().unwrap_or_default();

        if let Some(group) = group {
            if let Err(e) = self.store.get_group(group).await {
                if !e.is_not_found() {
                    return Err(e.into());
                }
                errors.add("group", INVALID_CHOICE);
            }
        }

        errors.into_result()?;
        Ok(cleaned?)
    }
}
