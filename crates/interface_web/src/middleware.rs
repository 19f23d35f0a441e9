//! HTTP middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use domain_blog::Actor;

use crate::auth::{bearer_token, validate_token};
use crate::AppState;

/// Authentication middleware
///
/// A valid bearer token puts the `Actor` into the request extensions. Missing
/// or invalid tokens leave the request anonymous; routes that need a user
/// redirect to the login page through the `CurrentUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    if let Some(token) = token {
        match validate_token(&token, &state.config.jwt_secret).and_then(|c| c.actor()) {
            Ok(actor) => {
                request.extensions_mut().insert(actor);
            }
            Err(e) => warn!(error = %e, "Ignoring invalid access token"),
        }
    }

    next.run(request).await
}

/// Request logging middleware
///
/// Logs method, uri, user, status and duration of every request
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user = request
        .extensions()
        .get::<Actor>()
        .map(|a| a.username.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "HTTP request"
    );

    response
}
