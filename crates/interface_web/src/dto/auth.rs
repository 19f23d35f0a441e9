//! Account DTOs

use serde::{Deserialize, Serialize};

use domain_blog::{FieldSpec, User};

use super::AuthorView;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: AuthorView,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64, user: &User) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
            expires_in,
            user: user.summary().into(),
        }
    }
}

/// What the login page offers
#[derive(Debug, Serialize)]
pub struct LoginFormResponse {
    pub fields: Vec<FieldSpec>,
    /// Where to go after signing in
    pub next: Option<String>,
}
