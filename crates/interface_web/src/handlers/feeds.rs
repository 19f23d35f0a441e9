//! Feed handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::feed::{FeedResponse, GroupFeedResponse, ProfileResponse};
use crate::error::WebError;
use crate::extract::{CurrentUser, MaybeUser, PageQuery};
use crate::AppState;

/// Home page: every post, newest first
pub async fn index(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<FeedResponse>, WebError> {
    let feed = state.service.index(page).await?;
    Ok(Json(feed.into()))
}

pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    PageQuery(page): PageQuery,
) -> Result<Json<GroupFeedResponse>, WebError> {
    let feed = state.service.group_feed(&slug, page).await?;
    Ok(Json(feed.into()))
}

/// An author's posts, with the viewer's follow state
pub async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
    PageQuery(page): PageQuery,
) -> Result<Json<ProfileResponse>, WebError> {
    let profile = state
        .service
        .profile(&username, viewer.as_ref(), page)
        .await?;
    Ok(Json(profile.into()))
}

/// Posts of the authors the user follows
pub async fn follow_index(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PageQuery(page): PageQuery,
) -> Result<Json<FeedResponse>, WebError> {
    let feed = state.service.follow_feed(&actor, page).await?;
    Ok(Json(feed.into()))
}
