//! Pre-built Test Fixtures
//!
//! [`BlogFixture`] wraps a `BlogService` and seeds users, groups and posts
//! through the store so tests only spell out what they assert on.

use std::sync::Arc;

use core_kernel::Paginator;
use domain_blog::ports::memory::InMemoryBlogStore;
use domain_blog::ports::{GroupPort, UserPort};
use domain_blog::{Actor, BlogService, BlogStore, Group, NewGroup, Post, PostForm};

use crate::builders::TestUserBuilder;

/// A blog service plus seeding helpers
#[derive(Clone)]
pub struct BlogFixture {
    pub store: Arc<dyn BlogStore>,
    pub service: BlogService,
}

impl BlogFixture {
    /// A fixture over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryBlogStore::new()))
    }

    pub fn with_store(store: Arc<dyn BlogStore>) -> Self {
        Self {
            service: BlogService::new(store.clone()),
            store,
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.service = self.service.with_paginator(paginator);
        self
    }

    /// Registers a user without a usable password
    pub async fn user(&self, username: &str) -> Actor {
        let user = self
            .store
            .create_user(TestUserBuilder::new().with_username(username).build())
            .await
            .expect("Failed to seed user");
        Actor::from(&user)
    }

    /// Creates a group titled after its slug
    pub async fn group(&self, slug: &str) -> Group {
        self.store
            .create_group(NewGroup::new(
                format!("Group {}", slug),
                slug,
                format!("Posts about {}", slug),
            ))
            .await
            .expect("Failed to seed group")
    }

    /// Publishes a post through the service
    pub async fn post(&self, author: &Actor, text: &str, group: Option<&Group>) -> Post {
        self.service
            .create_post(author, PostForm::new(text, group.map(|g| g.id)), None)
            .await
            .expect("Failed to seed post")
    }

    /// Publishes `count` numbered posts, returned oldest first
    pub async fn posts(&self, author: &Actor, count: usize) -> Vec<Post> {
        let mut posts = Vec::with_capacity(count);
        for i in 0..count {
            posts.push(self.post(author, &format!("Test post number {}", i), None).await);
        }
        posts
    }
}
