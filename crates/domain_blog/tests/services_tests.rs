//! Blog Service Tests
//!
//! Exercises `BlogService` against the in-memory store:
//! - Feeds: ordering, pagination, group isolation, follow feed
//! - Authoring: create, edit by author and non-author, delete, comments
//! - Following: create, repeat, self-follow, unfollow
//! - Accounts: signup validation and authentication

use std::sync::Arc;

use core_kernel::{GroupId, PageRequest, Paginator, PostId};
use domain_blog::forms::{
    CommentForm, PostForm, SignupForm, INVALID_CHOICE, POST_TOO_SHORT, USERNAME_TAKEN,
};
use domain_blog::ports::memory::InMemoryBlogStore;
use domain_blog::ports::{BlogStore, GroupPort, UserPort};
use domain_blog::{
    Actor, BlogError, BlogService, EditAccess, EditOutcome, FollowOutcome, Group, NewGroup,
    NewUser, Post,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn service() -> BlogService {
    let store: Arc<dyn BlogStore> = Arc::new(InMemoryBlogStore::new());
    BlogService::new(store)
}

async fn user(service: &BlogService, username: &str) -> Actor {
    let user = service
        .store()
        .create_user(NewUser {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            password_hash: String::new(),
        })
        .await
        .unwrap();
    Actor::from(&user)
}

async fn group(service: &BlogService, slug: &str) -> Group {
    service
        .store()
        .create_group(NewGroup::new(format!("Group {}", slug), slug, "Test group"))
        .await
        .unwrap()
}

async fn post(service: &BlogService, author: &Actor, text: &str, group: Option<GroupId>) -> Post {
    service
        .create_post(author, PostForm::new(text, group), None)
        .await
        .unwrap()
}

fn ids(posts: &[domain_blog::PostEntry]) -> Vec<PostId> {
    posts.iter().map(|e| e.post.id).collect()
}

// ============================================================================
// FEEDS
// ============================================================================

mod feeds {
    use super::*;

    #[tokio::test]
    async fn test_index_lists_newest_first() {
        let service = service();
        let author = user(&service, "auth").await;
        let first = post(&service, &author, "First post", None).await;
        let second = post(&service, &author, "Second post", None).await;

        let feed = service.index(PageRequest::first()).await.unwrap();

        assert_eq!(feed.title, "Latest updates on the site");
        assert_eq!(ids(&feed.page.items), vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_index_paginates_by_ten() {
        let service = service();
        let author = user(&service, "paginator").await;
        for i in 0..13 {
            post(&service, &author, &format!("Post number {}", i), None).await;
        }

        let first = service.index(PageRequest::first()).await.unwrap();
        assert_eq!(first.page.len(), 10);
        assert_eq!(first.page.num_pages, 2);
        assert!(first.page.has_next());

        let second = service.index(PageRequest::new(2)).await.unwrap();
        assert_eq!(second.page.len(), 3);
        assert!(!second.page.has_next());
    }

    #[tokio::test]
    async fn test_out_of_range_page_serves_last_page() {
        let service = service();
        let author = user(&service, "auth").await;
        for i in 0..13 {
            post(&service, &author, &format!("Post number {}", i), None).await;
        }

        let feed = service.index(PageRequest::new(500)).await.unwrap();
        assert_eq!(feed.page.number, 2);
        assert_eq!(feed.page.len(), 3);

        let feed = service.index(PageRequest::parse(Some("abc"))).await.unwrap();
        assert_eq!(feed.page.number, 1);
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let service = service().with_paginator(Paginator::new(2));
        let author = user(&service, "auth").await;
        for i in 0..5 {
            post(&service, &author, &format!("Post number {}", i), None).await;
        }

        let feed = service.index(PageRequest::first()).await.unwrap();
        assert_eq!(feed.page.len(), 2);
        assert_eq!(feed.page.num_pages, 3);
    }

    #[tokio::test]
    async fn test_group_feed_only_shows_group_posts() {
        let service = service();
        let author = user(&service, "auth").await;
        let cats = group(&service, "cats").await;
        let dogs = group(&service, "dogs").await;
        let in_cats = post(&service, &author, "About cats", Some(cats.id)).await;
        post(&service, &author, "About dogs", Some(dogs.id)).await;
        post(&service, &author, "About nothing", None).await;

        let feed = service.group_feed("cats", PageRequest::first()).await.unwrap();

        assert_eq!(feed.title, "Posts of community cats");
        assert_eq!(feed.group.id, cats.id);
        assert_eq!(ids(&feed.page.items), vec![in_cats.id]);
        assert_eq!(feed.page.items[0].group.as_ref().map(|g| g.slug.as_str()), Some("cats"));
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let service = service();
        let err = service.group_feed("missing", PageRequest::first()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_profile_shows_author_posts_and_counts() {
        let service = service();
        let leo = user(&service, "leo").await;
        let other = user(&service, "other").await;
        post(&service, &leo, "Leo writes", None).await;
        post(&service, &leo, "Leo writes again", None).await;
        post(&service, &other, "Someone else", None).await;

        let profile = service.profile("leo", None, PageRequest::first()).await.unwrap();

        assert_eq!(profile.title, "Posts by leo");
        assert_eq!(profile.author.username, "leo");
        assert_eq!(profile.posts_count, 2);
        assert!(profile.page.items.iter().all(|e| e.author.username == "leo"));
        assert!(!profile.following);
    }

    #[tokio::test]
    async fn test_profile_reports_following_for_viewer() {
        let service = service();
        let leo = user(&service, "leo").await;
        let reader = user(&service, "reader").await;
        service.follow(&reader, "leo").await.unwrap();

        let profile = service
            .profile("leo", Some(&reader), PageRequest::first())
            .await
            .unwrap();
        assert!(profile.following);
        assert_eq!(profile.follow_stats.followers, 1);

        let own = service.profile("leo", Some(&leo), PageRequest::first()).await.unwrap();
        assert!(!own.following);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let service = service();
        let err = service.profile("ghost", None, PageRequest::first()).await.unwrap_err();
        assert!(matches!(err, BlogError::NotFound { entity: "User", .. }));
    }

    #[tokio::test]
    async fn test_post_detail_includes_comments_and_author_count() {
        let service = service();
        let author = user(&service, "auth").await;
        let reader = user(&service, "reader").await;
        let target = post(&service, &author, "Commented post", None).await;
        post(&service, &author, "Another post", None).await;
        service
            .add_comment(&reader, target.id, CommentForm::new("Nice one"))
            .await
            .unwrap();

        let detail = service.post_detail(target.id).await.unwrap();

        assert_eq!(detail.entry.post.id, target.id);
        assert_eq!(detail.author_posts_count, 2);
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].author.username, "reader");
        assert_eq!(detail.comments[0].comment.text, "Nice one");
    }

    #[tokio::test]
    async fn test_missing_post_detail_is_not_found() {
        let service = service();
        let err = service.post_detail(PostId::new_v7()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

// ============================================================================
// AUTHORING
// ============================================================================

mod authoring {
    use super::*;

    #[tokio::test]
    async fn test_create_post_trims_text_and_keeps_image() {
        let service = service();
        let author = user(&service, "auth").await;
        let created = service
            .create_post(
                &author,
                PostForm::new("  Hello there  ", None),
                Some("posts/cat.gif".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(created.text, "Hello there");
        assert_eq!(created.author, author.id);
        assert_eq!(created.image.as_deref(), Some("posts/cat.gif"));
    }

    #[tokio::test]
    async fn test_short_post_is_rejected() {
        let service = service();
        let author = user(&service, "auth").await;
        let err = service
            .create_post(&author, PostForm::new("hi", None), None)
            .await
            .unwrap_err();

        match err {
            BlogError::Form(errors) => {
                assert_eq!(errors.get("text"), Some(&[POST_TOO_SHORT.to_string()][..]))
            }
            other => panic!("Expected form error, got {:?}", other),
        }
        let feed = service.index(PageRequest::first()).await.unwrap();
        assert!(feed.page.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_group_is_an_invalid_choice() {
        let service = service();
        let author = user(&service, "auth").await;
        let err = service
            .create_post(&author, PostForm::new("x", Some(GroupId::new_v7())), None)
            .await
            .unwrap_err();

        let BlogError::Form(errors) = err else {
            panic!("Expected form error");
        };
        assert_eq!(errors.get("group"), Some(&[INVALID_CHOICE.to_string()][..]));
        assert!(errors.get("text").is_some());
    }

    #[tokio::test]
    async fn test_author_edits_post() {
        let service = service();
        let author = user(&service, "auth").await;
        let cats = group(&service, "cats").await;
        let original = service
            .create_post(&author, PostForm::new("Original text", None), Some("posts/a.png".into()))
            .await
            .unwrap();

        let access = service.edit_access(&author, original.id).await.unwrap();
        assert!(matches!(access, EditAccess::Granted(_)));

        let outcome = service
            .edit_post(&author, original.id, PostForm::new("Edited text", Some(cats.id)), None)
            .await
            .unwrap();

        let EditOutcome::Updated(updated) = outcome else {
            panic!("Expected update");
        };
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.text, "Edited text");
        assert_eq!(updated.group, Some(cats.id));
        assert_eq!(updated.image.as_deref(), Some("posts/a.png"));
        assert_eq!(updated.pub_date, original.pub_date);
    }

    #[tokio::test]
    async fn test_non_author_cannot_edit() {
        let service = service();
        let author = user(&service, "auth").await;
        let intruder = user(&service, "intruder").await;
        let original = post(&service, &author, "Original text", None).await;

        let access = service.edit_access(&intruder, original.id).await.unwrap();
        assert!(matches!(access, EditAccess::NotAuthor));

        let outcome = service
            .edit_post(&intruder, original.id, PostForm::new("Hijacked", None), None)
            .await
            .unwrap();
        assert!(matches!(outcome, EditOutcome::NotAuthor));

        let detail = service.post_detail(original.id).await.unwrap();
        assert_eq!(detail.entry.post.text, "Original text");
    }

    #[tokio::test]
    async fn test_delete_post_only_by_author() {
        let service = service();
        let author = user(&service, "auth").await;
        let other = user(&service, "other").await;
        let target = post(&service, &author, "Doomed post", None).await;

        assert!(!service.delete_post(&other, target.id).await.unwrap());
        assert!(service.delete_post(&author, target.id).await.unwrap());
        assert!(service.post_detail(target.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_comment_is_dropped() {
        let service = service();
        let author = user(&service, "auth").await;
        let target = post(&service, &author, "Commented post", None).await;

        let stored = service
            .add_comment(&author, target.id, CommentForm::new("  "))
            .await
            .unwrap();
        assert!(stored.is_none());

        let detail = service.post_detail(target.id).await.unwrap();
        assert!(detail.comments.is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_is_not_found() {
        let service = service();
        let author = user(&service, "auth").await;
        let err = service
            .add_comment(&author, PostId::new_v7(), CommentForm::new("Hello"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_group_choices_sorted_by_title() {
        let service = service();
        group(&service, "zeta").await;
        group(&service, "alpha").await;

        let choices = service.group_choices().await.unwrap();
        let slugs: Vec<&str> = choices.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "zeta"]);
    }
}

// ============================================================================
// FOLLOWING
// ============================================================================

mod following {
    use super::*;

    #[tokio::test]
    async fn test_follow_feed_shows_followed_authors_only() {
        let service = service();
        let reader = user(&service, "reader").await;
        let leo = user(&service, "leo").await;
        let other = user(&service, "other").await;
        let by_leo = post(&service, &leo, "Leo writes", None).await;
        post(&service, &other, "Other writes", None).await;

        let outcome = service.follow(&reader, "leo").await.unwrap();
        assert_eq!(outcome, FollowOutcome::Created);

        let feed = service.follow_feed(&reader, PageRequest::first()).await.unwrap();
        assert_eq!(feed.title, "My subscriptions");
        assert_eq!(ids(&feed.page.items), vec![by_leo.id]);

        let other_feed = service.follow_feed(&other, PageRequest::first()).await.unwrap();
        assert!(other_feed.page.is_empty());
    }

    #[tokio::test]
    async fn test_follow_twice_keeps_one_follow() {
        let service = service();
        let reader = user(&service, "reader").await;
        user(&service, "leo").await;

        service.follow(&reader, "leo").await.unwrap();
        let again = service.follow(&reader, "leo").await.unwrap();
        assert_eq!(again, FollowOutcome::AlreadyFollowing);

        let profile = service.profile("leo", None, PageRequest::first()).await.unwrap();
        assert_eq!(profile.follow_stats.followers, 1);
    }

    #[tokio::test]
    async fn test_self_follow_is_ignored() {
        let service = service();
        let leo = user(&service, "leo").await;

        let outcome = service.follow(&leo, "leo").await.unwrap();
        assert_eq!(outcome, FollowOutcome::Ignored);

        let profile = service.profile("leo", None, PageRequest::first()).await.unwrap();
        assert_eq!(profile.follow_stats.following, 0);
    }

    #[tokio::test]
    async fn test_follow_unknown_author_is_not_found() {
        let service = service();
        let reader = user(&service, "reader").await;
        assert!(service.follow(&reader, "ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unfollow_removes_follow() {
        let service = service();
        let reader = user(&service, "reader").await;
        let leo = user(&service, "leo").await;
        post(&service, &leo, "Leo writes", None).await;
        service.follow(&reader, "leo").await.unwrap();

        assert!(service.unfollow(&reader, "leo").await.unwrap());
        assert!(!service.unfollow(&reader, "leo").await.unwrap());
        assert!(!service.unfollow(&reader, "ghost").await.unwrap());

        let feed = service.follow_feed(&reader, PageRequest::first()).await.unwrap();
        assert!(feed.page.is_empty());
    }
}

// ============================================================================
// ACCOUNTS
// ============================================================================

mod accounts {
    use super::*;

    fn signup_form(username: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            password: password.to_string(),
            first_name: Some("Leo".to_string()),
            last_name: None,
            email: Some("leo@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_signup_then_authenticate() {
        let service = service();
        let user = service.signup(signup_form("leo", "war-and-peace")).await.unwrap();

        assert_eq!(user.username, "leo");
        assert_ne!(user.password_hash, "war-and-peace");

        let authenticated = service.authenticate("leo", "war-and-peace").await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let service = service();
        service.signup(signup_form("leo", "war-and-peace")).await.unwrap();

        let err = service.authenticate("leo", "anna-karenina").await.unwrap_err();
        assert!(matches!(err, BlogError::InvalidCredentials));

        let err = service.authenticate("ghost", "war-and-peace").await.unwrap_err();
        assert!(matches!(err, BlogError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_form_error() {
        let service = service();
        service.signup(signup_form("leo", "war-and-peace")).await.unwrap();

        let err = service.signup(signup_form("leo", "another-pass")).await.unwrap_err();
        let BlogError::Form(errors) = err else {
            panic!("Expected form error");
        };
        assert_eq!(errors.get("username"), Some(&[USERNAME_TAKEN.to_string()][..]));
    }

    #[tokio::test]
    async fn test_signup_validates_fields() {
        let service = service();
        let mut form = signup_form("bad name", "short");
        form.email = Some("not-an-email".to_string());

        let BlogError::Form(errors) = service.signup(form).await.unwrap_err() else {
            panic!("Expected form error");
        };
        assert!(errors.get("username").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("email").is_some());
        assert!(service.store().find_user_by_username("bad name").await.unwrap().is_none());
    }
}
