//! Account handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use domain_blog::forms::FieldKind;
use domain_blog::{Actor, FieldSpec, SignupForm, User};

use crate::auth::create_token;
use crate::dto::auth::{LoginFormResponse, LoginRequest, TokenResponse};
use crate::error::WebError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn issue_token(state: &AppState, user: &User) -> Result<TokenResponse, WebError> {
    let expires_in = state.config.jwt_expiration_secs;
    let token = create_token(&Actor::from(user), &state.config.jwt_secret, expires_in)
        .map_err(|e| WebError::Internal(e.to_string()))?;
    Ok(TokenResponse::bearer(token, expires_in, user))
}

/// Registers an account and signs it in
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<TokenResponse>), WebError> {
    let user = state.service.signup(form).await?;
    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// Describes the login form; guests land here from protected pages
pub async fn login_form(Query(query): Query<LoginQuery>) -> Json<LoginFormResponse> {
    Json(LoginFormResponse {
        fields: vec![
            FieldSpec {
                name: "username",
                label: "Username",
                help_text: "",
                required: true,
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: "password",
                label: "Password",
                help_text: "",
                required: true,
                kind: FieldKind::Password,
            },
        ],
        next: query.next,
    })
}

/// Exchanges credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, WebError> {
    let user = state
        .service
        .authenticate(&request.username, &request.password)
        .await?;
    info!(username = %user.username, "User logged in");
    Ok(Json(issue_token(&state, &user)?))
}
