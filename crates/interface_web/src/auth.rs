//! Access tokens
//!
//! Clients authenticate with `Authorization: Bearer <token>`, where the token
//! is an HS256 JWT naming the user.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::UserId;
use domain_blog::Actor;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, bare UUID)
    pub sub: String,
    pub username: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// The user the token was issued to
    pub fn actor(&self) -> Result<Actor, AuthError> {
        let id: UserId = self.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Actor::new(id, self.username.clone()))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token could not be issued: {0}")]
    Signing(String),
}

/// Issues a token for the actor
///
/// # Arguments
///
/// * `actor` - The authenticated user
/// * `secret` - HS256 signing secret
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(actor: &Actor, secret: &str, expiration_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AuthError::Signing(format!("token lifetime of {}s is out of range", expiration_secs))
        })?;

    let claims = Claims {
        sub: actor.id.as_uuid().to_string(),
        username: actor.username.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Validates a token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Extracts the token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_names_the_actor() {
        let actor = Actor::new(UserId::new_v7(), "leo");
        let token = create_token(&actor, SECRET, 60).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.actor().unwrap(), actor);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let actor = Actor::new(UserId::new_v7(), "leo");
        let token = create_token(&actor, SECRET, 60).unwrap();

        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new_v7().as_uuid().to_string(),
            username: "leo".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let actor = Actor::new(UserId::new_v7(), "leo");
        assert!(matches!(
            create_token(&actor, SECRET, u64::MAX),
            Err(AuthError::Signing(_))
        ));
        assert!(matches!(
            create_token(&actor, SECRET, i64::MAX as u64),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
