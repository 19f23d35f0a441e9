//! Follow handlers
//!
//! Both actions answer with a redirect to the author's profile whatever the
//! outcome; following yourself or unfollowing a stranger changes nothing.

use axum::extract::{Path, State};
use tracing::debug;

use crate::error::WebError;
use crate::extract::CurrentUser;
use crate::redirect::{urls, Found};
use crate::AppState;

pub async fn profile_follow(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<Found, WebError> {
    let outcome = state.service.follow(&actor, &username).await?;
    debug!(?outcome, author = %username, "Follow requested");
    Ok(Found::to(urls::profile(&username)))
}

pub async fn profile_unfollow(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<Found, WebError> {
    state.service.unfollow(&actor, &username).await?;
    Ok(Found::to(urls::profile(&username)))
}
