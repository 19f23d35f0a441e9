//! Request extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use core_kernel::{PageRequest, PostId};
use domain_blog::Actor;

use crate::error::WebError;
use crate::redirect::{urls, Found};

/// The signed-in user; guests are redirected to the login page
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Actor);

/// Rejection for guests on login-required routes
#[derive(Debug)]
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Found::to(urls::login(&self.next)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Actor>() {
            Some(actor) => Ok(CurrentUser(actor.clone())),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string());
                Err(LoginRedirect { next })
            }
        }
    }
}

/// The signed-in user, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Actor>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Actor>().cloned()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<String>,
}

/// The `?page=` query parameter; never rejects
#[derive(Debug, Clone, Copy)]
pub struct PageQuery(pub PageRequest);

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map(|Query(p)| p)
            .unwrap_or_default();
        Ok(PageQuery(PageRequest::parse(params.page.as_deref())))
    }
}

/// Parses a post id taken from the path; malformed ids are simply unknown posts
pub fn parse_post_id(raw: &str) -> Result<PostId, WebError> {
    raw.parse().map_err(|_| WebError::page_not_found())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_post_id_is_not_found() {
        assert!(matches!(parse_post_id("42"), Err(WebError::NotFound(_))));

        let id = PostId::new_v7();
        assert_eq!(parse_post_id(&id.as_uuid().to_string()).unwrap(), id);
    }
}
