//! Redirects and the paths they point at

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use core_kernel::PostId;

use crate::error::WebError;

/// `302 Found` to a site path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found(pub String);

impl Found {
    pub fn to(location: impl Into<String>) -> Self {
        Found(location.into())
    }

    pub fn location(&self) -> &str {
        &self.0
    }
}

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        match HeaderValue::try_from(self.0) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(e) => WebError::Internal(format!("invalid redirect location: {}", e)).into_response(),
        }
    }
}

/// Site paths
pub mod urls {
    use super::*;

    pub const INDEX: &str = "/";
    pub const LOGIN: &str = "/auth/login/";
    pub const FOLLOW_INDEX: &str = "/follow/";

    pub fn profile(username: &str) -> String {
        format!("/profile/{}/", urlencoding::encode(username))
    }

    pub fn group(slug: &str) -> String {
        format!("/group/{}/", urlencoding::encode(slug))
    }

    pub fn post_detail(id: PostId) -> String {
        format!("/posts/{}/", id.as_uuid())
    }

    pub fn post_edit(id: PostId) -> String {
        format!("/posts/{}/edit/", id.as_uuid())
    }

    pub fn media(path: &str) -> String {
        format!("/media/{}", path)
    }

    /// The login page, returning to `next` afterwards
    pub fn login(next: &str) -> String {
        format!("{}?next={}", LOGIN, urlencoding::encode(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_found_sets_location() {
        let response = Found::to("/profile/leo/").into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/profile/leo/");
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(urls::login("/create/"), "/auth/login/?next=%2Fcreate%2F");
    }

    #[test]
    fn test_profile_url_escapes_username() {
        assert_eq!(urls::profile("jane+doe"), "/profile/jane%2Bdoe/");
    }

    proptest! {
        #[test]
        fn login_next_decodes_to_the_original_path(path in "/[a-z0-9/?=&%+ ]{0,40}") {
            let url = urls::login(&path);
            let encoded = url.strip_prefix("/auth/login/?next=").unwrap();
            prop_assert!(!encoded.contains('&') && !encoded.contains('?'));
            prop_assert_eq!(urlencoding::decode(encoded).unwrap().into_owned(), path);
        }
    }
}
