//! PostgreSQL Blog Store
//!
//! `PostgresBlogStore` implements every blog port with the repositories in
//! [`crate::repositories`]. It translates domain requests into repository
//! calls, maps rows back into domain types, and converts `DatabaseError`
//! into `PortError`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, GroupId, HealthCheckResult, HealthCheckable, Page, PageRequest,
    Paginator, PortError, PostId, UserId,
};
use domain_blog::ports::{CommentPort, FollowPort, GroupPort, PostPort, UserPort};
use domain_blog::{
    Comment, CommentEntry, FeedScope, Follow, FollowStats, Group, NewComment, NewGroup, NewPost,
    NewUser, Post, PostChanges, PostEntry, User, UserSummary,
};

use crate::repositories::{
    CommentEntryRow, CommentRepository, CommentRow, FollowRepository, FollowRow, GroupRepository,
    GroupRow, PostEntryRow, PostFilter, PostRepository, PostRow, UserRepository, UserRow,
};

/// PostgreSQL-backed implementation of the blog ports
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
/// - Foreign key and check violations -> `PortError::Validation`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresBlogStore {
    users: UserRepository,
    groups: GroupRepository,
    posts: PostRepository,
    comments: CommentRepository,
    follows: FollowRepository,
    pool: PgPool,
}

impl PostgresBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            follows: FollowRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PostgresBlogStore {}

#[async_trait]
impl HealthCheckable for PostgresBlogStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: "postgres-blog-store".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserPort for PostgresBlogStore {
    async fn get_user(&self, id: UserId) -> Result<User, PortError> {
        let row = self.users.get(id.into()).await?;
        Ok(row_to_user(row))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
        let row = self.users.find_by_username(username).await?;
        Ok(row.map(row_to_user))
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User, PortError> {
        let user = user.into_user();
        let row = self.users.insert(&user_to_row(&user)).await?;
        debug!("User row inserted");
        Ok(row_to_user(row))
    }
}

#[async_trait]
impl GroupPort for PostgresBlogStore {
    async fn get_group(&self, id: GroupId) -> Result<Group, PortError> {
        let row = self.groups.get(id.into()).await?;
        Ok(row_to_group(row))
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>, PortError> {
        let row = self.groups.find_by_slug(slug).await?;
        Ok(row.map(row_to_group))
    }

    async fn list_groups(&self) -> Result<Vec<Group>, PortError> {
        let rows = self.groups.list().await?;
        Ok(rows.into_iter().map(row_to_group).collect())
    }

    #[instrument(skip(self, group), fields(slug = %group.slug))]
    async fn create_group(&self, group: NewGroup) -> Result<Group, PortError> {
        let group = group.into_group();
        let row = self
            .groups
            .insert(&GroupRow {
                group_id: group.id.into(),
                title: group.title,
                slug: group.slug,
                description: group.description,
            })
            .await?;
        Ok(row_to_group(row))
    }
}

#[async_trait]
impl PostPort for PostgresBlogStore {
    #[instrument(skip(self), fields(post_id = %id))]
    async fn get_post(&self, id: PostId) -> Result<PostEntry, PortError> {
        let row = self.posts.get_entry(id.into()).await?;
        Ok(row_to_entry(row))
    }

    #[instrument(skip(self, paginator, page))]
    async fn list_posts(
        &self,
        scope: FeedScope,
        paginator: Paginator,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, PortError> {
        let filter = scope_to_filter(scope);
        let total = self.posts.count(filter).await?;
        let window = paginator.resolve(page, total);
        debug!(total, page = window.number, "Fetching feed window");

        let rows = self
            .posts
            .list_entries(filter, window.limit as i64, window.offset as i64)
            .await?;
        let entries = rows.into_iter().map(row_to_entry).collect();

        Ok(Page::from_window(entries, window, paginator.per_page()))
    }

    async fn count_posts(&self, scope: FeedScope) -> Result<u64, PortError> {
        Ok(self.posts.count(scope_to_filter(scope)).await?)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, PortError> {
        let post = post.into_post();
        let row = self
            .posts
            .insert(&PostRow {
                post_id: post.id.into(),
                text: post.text,
                pub_date: post.pub_date,
                author_id: post.author.into(),
                group_id: post.group.map(Into::into),
                image: post.image,
            })
            .await?;
        Ok(row_to_post(row))
    }

    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Post, PortError> {
        let row = self
            .posts
            .update(
                id.into(),
                &changes.text,
                changes.group.map(Into::into),
                changes.image.as_deref(),
            )
            .await?;
        Ok(row_to_post(row))
    }

    async fn delete_post(&self, id: PostId) -> Result<(), PortError> {
        self.posts.delete(id.into()).await?;
        Ok(())
    }
}

#[async_trait]
impl CommentPort for PostgresBlogStore {
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, PortError> {
        let comment = comment.into_comment();
        let row = self
            .comments
            .insert(&CommentRow {
                comment_id: comment.id.into(),
                post_id: comment.post.into(),
                author_id: comment.author.into(),
                text: comment.text,
                created: comment.created,
            })
            .await?;
        Ok(row_to_comment(row))
    }

    async fn list_comments(&self, post: PostId) -> Result<Vec<CommentEntry>, PortError> {
        let rows = self.comments.list_for_post(post.into()).await?;
        Ok(rows.into_iter().map(row_to_comment_entry).collect())
    }
}

#[async_trait]
impl FollowPort for PostgresBlogStore {
    async fn follow(&self, follow: Follow) -> Result<bool, PortError> {
        let created = self
            .follows
            .insert(&FollowRow {
                follow_id: follow.id.into(),
                user_id: follow.user.into(),
                author_id: follow.author.into(),
                created: follow.created,
            })
            .await?;
        Ok(created)
    }

    async fn unfollow(&self, user: UserId, author: UserId) -> Result<bool, PortError> {
        Ok(self.follows.delete(user.into(), author.into()).await?)
    }

    async fn is_following(&self, user: UserId, author: UserId) -> Result<bool, PortError> {
        Ok(self.follows.exists(user.into(), author.into()).await?)
    }

    async fn follow_stats(&self, user: UserId) -> Result<FollowStats, PortError> {
        let (followers, following) = self.follows.counts(user.into()).await?;
        Ok(FollowStats {
            followers: followers.max(0) as u64,
            following: following.max(0) as u64,
        })
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn scope_to_filter(scope: FeedScope) -> PostFilter {
    match scope {
        FeedScope::All => PostFilter::default(),
        FeedScope::Group(group) => PostFilter {
            group_id: Some(group.into()),
            ..PostFilter::default()
        },
        FeedScope::Author(author) => PostFilter {
            author_id: Some(author.into()),
            ..PostFilter::default()
        },
        FeedScope::Following(user) => PostFilter {
            followed_by: Some(user.into()),
            ..PostFilter::default()
        },
    }
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        user_id: user.id.into(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        date_joined: user.date_joined,
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from(row.user_id),
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        password_hash: row.password_hash,
        date_joined: row.date_joined,
    }
}

fn row_to_group(row: GroupRow) -> Group {
    Group {
        id: GroupId::from(row.group_id),
        title: row.title,
        slug: row.slug,
        description: row.description,
    }
}

fn row_to_post(row: PostRow) -> Post {
    Post {
        id: PostId::from(row.post_id),
        text: row.text,
        pub_date: row.pub_date,
        author: UserId::from(row.author_id),
        group: row.group_id.map(GroupId::from),
        image: row.image,
    }
}

fn row_to_entry(row: PostEntryRow) -> PostEntry {
    let author = UserSummary::from_parts(
        UserId::from(row.author_id),
        row.author_username,
        &row.author_first_name,
        &row.author_last_name,
    );

    // the joined group columns are all present or all null
    let group = match (row.group_id, row.group_title, row.group_slug) {
        (Some(id), Some(title), Some(slug)) => Some(Group {
            id: GroupId::from(id),
            title,
            slug,
            description: row.group_description.unwrap_or_default(),
        }),
        _ => None,
    };

    PostEntry {
        post: Post {
            id: PostId::from(row.post_id),
            text: row.text,
            pub_date: row.pub_date,
            author: author.id,
            group: group.as_ref().map(|g| g.id),
            image: row.image,
        },
        author,
        group,
    }
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: row.comment_id.into(),
        post: row.post_id.into(),
        author: row.author_id.into(),
        text: row.text,
        created: row.created,
    }
}

fn row_to_comment_entry(row: CommentEntryRow) -> CommentEntry {
    CommentEntry {
        author: UserSummary::from_parts(
            UserId::from(row.author_id),
            row.author_username,
            &row.author_first_name,
            &row.author_last_name,
        ),
        comment: Comment {
            id: row.comment_id.into(),
            post: row.post_id.into(),
            author: row.author_id.into(),
            text: row.text,
            created: row.created,
        },
    }
}
