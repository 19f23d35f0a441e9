//! PostgreSQL Blog Store Tests
//!
//! Runs the blog service against a real PostgreSQL started with
//! testcontainers. Every test needs Docker:
//!
//! ```text
//! cargo test -p infra_db -- --ignored
//! ```

use std::sync::Arc;

use core_kernel::{PageRequest, PortError};
use domain_blog::ports::{FollowPort, PostPort, UserPort};
use domain_blog::{BlogStore, CommentForm, FeedScope, Follow, FollowOutcome, PostForm};
use test_utils::{
    assert_form_error, assert_newest_first, assert_page_ids, create_isolated_test_database,
    get_shared_test_database, unique_username, BlogFixture, TestUserBuilder,
};

async fn fixture() -> BlogFixture {
    let db = get_shared_test_database().await;
    let store: Arc<dyn BlogStore> = Arc::new(db.store());
    BlogFixture::with_store(store)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_username_is_conflict() {
    let db = get_shared_test_database().await;
    let store = db.store();
    let username = unique_username("dup");

    store
        .create_user(TestUserBuilder::new().with_username(&username).build())
        .await
        .unwrap();
    let err = store
        .create_user(TestUserBuilder::new().with_username(&username).build())
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::Conflict { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_profile_feed_is_paginated_newest_first() {
    let fx = fixture().await;
    let author = fx.user(&unique_username("author")).await;
    let posts = fx.posts(&author, 13).await;

    let profile = fx
        .service
        .profile(&author.username, None, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(profile.posts_count, 13);
    assert_eq!(profile.page.len(), 10);
    assert_newest_first(&profile.page);

    let last = fx
        .service
        .profile(&author.username, None, PageRequest::new(99))
        .await
        .unwrap();
    let expected: Vec<_> = posts.iter().take(3).rev().map(|p| p.id).collect();
    assert_page_ids(&last.page, &expected);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_group_feed_and_post_detail() {
    let fx = fixture().await;
    let author = fx.user(&unique_username("author")).await;
    let reader = fx.user(&unique_username("reader")).await;
    let group = fx.group(&unique_username("group")).await;
    let in_group = fx.post(&author, "Inside the group", Some(&group)).await;
    fx.post(&author, "Outside any group", None).await;

    let feed = fx.service.group_feed(&group.slug, PageRequest::first()).await.unwrap();
    assert_page_ids(&feed.page, &[in_group.id]);
    assert_eq!(feed.page.items[0].group.as_ref(), Some(&group));

    fx.service
        .add_comment(&reader, in_group.id, CommentForm::new("First comment"))
        .await
        .unwrap();
    let detail = fx.service.post_detail(in_group.id).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].author.username, reader.username);
    assert_eq!(detail.author_posts_count, 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_edit_keeps_image_and_validates_group() {
    let fx = fixture().await;
    let author = fx.user(&unique_username("author")).await;
    let post = fx
        .service
        .create_post(&author, PostForm::new("With picture", None), Some("posts/a.png".into()))
        .await
        .unwrap();

    fx.service
        .edit_post(&author, post.id, PostForm::new("Edited", None), None)
        .await
        .unwrap();
    let entry = fx.store.get_post(post.id).await.unwrap();
    assert_eq!(entry.post.text, "Edited");
    assert_eq!(entry.post.image.as_deref(), Some("posts/a.png"));

    let err = fx
        .service
        .edit_post(
            &author,
            post.id,
            PostForm::new("Edited", Some(core_kernel::GroupId::new_v7())),
            None,
        )
        .await
        .unwrap_err();
    assert_form_error(&err, "group", domain_blog::forms::INVALID_CHOICE);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_follow_is_idempotent_and_feeds_subscriptions() {
    let fx = fixture().await;
    let reader = fx.user(&unique_username("reader")).await;
    let author = fx.user(&unique_username("author")).await;
    let post = fx.post(&author, "Worth following", None).await;

    assert_eq!(
        fx.service.follow(&reader, &author.username).await.unwrap(),
        FollowOutcome::Created
    );
    assert_eq!(
        fx.service.follow(&reader, &author.username).await.unwrap(),
        FollowOutcome::AlreadyFollowing
    );
    assert_eq!(
        fx.service.follow(&reader, &reader.username).await.unwrap(),
        FollowOutcome::Ignored
    );

    let stats = fx.store.follow_stats(author.id).await.unwrap();
    assert_eq!(stats.followers, 1);

    let feed = fx.service.follow_feed(&reader, PageRequest::first()).await.unwrap();
    assert_page_ids(&feed.page, &[post.id]);

    assert!(fx.service.unfollow(&reader, &author.username).await.unwrap());
    let count = fx.store.count_posts(FeedScope::Following(reader.id)).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_self_follow_rejected_by_schema() {
    let db = get_shared_test_database().await;
    let store = db.store();
    let user = store
        .create_user(TestUserBuilder::new().build())
        .await
        .unwrap();

    // bypass the domain check to reach the CHECK constraint
    let follow = Follow {
        id: core_kernel::FollowId::new_v7(),
        user: user.id,
        author: user.id,
        created: chrono::Utc::now(),
    };
    let err = store.follow(follow).await.unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_delete_post_removes_comments() {
    let db = create_isolated_test_database().await.unwrap();
    let fx = BlogFixture::with_store(Arc::new(db.store()));
    let author = fx.user("author").await;
    let post = fx.post(&author, "Short lived", None).await;
    fx.service
        .add_comment(&author, post.id, CommentForm::new("Soon gone"))
        .await
        .unwrap();

    assert!(fx.service.delete_post(&author, post.id).await.unwrap());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    db.clear_data().await.unwrap();
    let index = fx.service.index(PageRequest::first()).await.unwrap();
    assert!(index.page.is_empty());
}
