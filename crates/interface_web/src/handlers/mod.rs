//! Request handlers

pub mod about;
pub mod auth;
pub mod feeds;
pub mod follow;
pub mod health;
pub mod posts;

use crate::error::WebError;

/// Fallback for unknown routes
pub async fn not_found() -> WebError {
    WebError::page_not_found()
}
