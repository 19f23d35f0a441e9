//! HTTP layer of the blog
//!
//! This crate serves the blog over HTTP using Axum. Pages are JSON view
//! models; successful form submissions answer `302 Found` to the page the
//! user lands on, like a browser-facing site would.
//!
//! # Architecture
//!
//! - **Handlers**: feeds, post authoring, comments, follows, accounts
//! - **Middleware**: bearer-token authentication, request logging, home-page cache
//! - **DTOs**: view models built from domain values
//! - **Error Handling**: consistent JSON error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interface_web::{create_router, config::WebConfig, AppState};
//! use domain_blog::InMemoryBlogStore;
//!
//! let state = AppState::new(Arc::new(InMemoryBlogStore::new()), WebConfig::default());
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod redirect;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use core_kernel::Paginator;
use domain_blog::{BlogService, BlogStore};

use crate::cache::{cache_page, PageCache};
use crate::config::WebConfig;
use crate::handlers::{about, auth as account, feeds, follow, health, posts};
use crate::media::MediaStore;
use crate::middleware::{auth_middleware, request_log_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BlogService,
    pub config: Arc<WebConfig>,
    pub cache: PageCache,
    pub media: MediaStore,
}

impl AppState {
    /// Wires the service, page cache and media store from the configuration
    pub fn new(store: Arc<dyn BlogStore>, config: WebConfig) -> Self {
        let service =
            BlogService::new(store).with_paginator(Paginator::new(config.posts_per_page));
        let cache = PageCache::new(Duration::from_secs(config.index_cache_ttl_secs));
        let media = MediaStore::new(&config.media_root);

        Self {
            service,
            config: Arc::new(config),
            cache,
            media,
        }
    }
}

/// Creates the router with every route and middleware
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured Axum router
pub fn create_router(state: AppState) -> Router {
    // Only the home page is cached
    let index_routes = Router::new().route(
        "/",
        get(feeds::index).route_layer(axum_middleware::from_fn_with_state(
            state.cache.clone(),
            cache_page,
        )),
    );

    let feed_routes = Router::new()
        .route("/group/:slug/", get(feeds::group_posts))
        .route("/profile/:username/", get(feeds::profile))
        .route("/follow/", get(feeds::follow_index));

    let post_routes = Router::new()
        .route("/create/", get(posts::create_form).post(posts::create_post))
        .route("/posts/:post_id/", get(posts::post_detail))
        .route("/posts/:post_id/edit/", get(posts::edit_form).post(posts::edit_post))
        .route("/posts/:post_id/comment/", post(posts::add_comment))
        .route("/posts/:post_id/delete/", post(posts::delete_post));

    let follow_routes = Router::new()
        .route(
            "/profile/:username/follow/",
            get(follow::profile_follow).post(follow::profile_follow),
        )
        .route(
            "/profile/:username/unfollow/",
            get(follow::profile_unfollow).post(follow::profile_unfollow),
        );

    let account_routes = Router::new()
        .route("/auth/signup/", post(account::signup))
        .route("/auth/login/", get(account::login_form).post(account::login));

    let public_routes = Router::new()
        .route("/about/author/", get(about::author))
        .route("/about/tech/", get(about::tech))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    Router::new()
        .merge(index_routes)
        .merge(feed_routes)
        .merge(post_routes)
        .merge(follow_routes)
        .merge(account_routes)
        .merge(public_routes)
        .nest_service("/media", ServeDir::new(state.media.root()))
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
