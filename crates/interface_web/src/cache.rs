//! Whole-page cache for the home page
//!
//! Successful `GET` responses are kept for a fixed time-to-live, keyed by the
//! request path and query. Writes do not invalidate entries, so a new post
//! shows up on the home page once the cached copy expires.

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use moka::future::Cache;
use tracing::{debug, warn};

use crate::error::WebError;

const MAX_ENTRIES: u64 = 1_000;

/// A stored response body
#[derive(Debug, Clone)]
pub struct CachedPage {
    body: Bytes,
    content_type: Option<HeaderValue>,
}

impl IntoResponse for CachedPage {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Body::from(self.body)).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// TTL cache of rendered pages
#[derive(Clone)]
pub struct PageCache {
    pages: Cache<String, CachedPage>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { pages }
    }

    pub async fn get(&self, key: &str) -> Option<CachedPage> {
        self.pages.get(key).await
    }

    pub async fn insert(&self, key: String, page: CachedPage) {
        self.pages.insert(key, page).await;
    }

    /// Drops every cached page
    pub fn invalidate_all(&self) {
        self.pages.invalidate_all();
    }
}

fn cache_key(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Serves cached copies of `GET` responses and stores fresh `200 OK` ones
pub async fn cache_page(State(cache): State<PageCache>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    if let Some(page) = cache.get(&key).await {
        debug!(key = %key, "Page cache hit");
        return page.into_response();
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to buffer response for caching");
            return WebError::Internal(e.to_string()).into_response();
        }
    };

    let page = CachedPage {
        body: body.clone(),
        content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
    };
    cache.insert(key, page).await;

    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_and_invalidate() {
        let cache = PageCache::new(Duration::from_secs(20));
        let page = CachedPage {
            body: Bytes::from_static(b"{}"),
            content_type: Some(HeaderValue::from_static("application/json")),
        };

        cache.insert("/?page=2".to_string(), page).await;
        assert!(cache.get("/?page=2").await.is_some());
        assert!(cache.get("/").await.is_none());

        cache.invalidate_all();
        assert!(cache.get("/?page=2").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = PageCache::new(Duration::from_millis(50));
        let page = CachedPage {
            body: Bytes::from_static(b"{}"),
            content_type: None,
        };

        cache.insert("/".to_string(), page).await;
        assert!(cache.get("/").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("/").await.is_none());
    }
}
