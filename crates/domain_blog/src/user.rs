//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

/// Maximum username length
pub const USERNAME_MAX_LENGTH: usize = 150;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Argon2 PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Returns "first last", falling back to the username when both are blank
    pub fn full_name(&self) -> String {
        display_name(&self.username, &self.first_name, &self.last_name)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name(),
        }
    }
}

/// Public view of a user attached to posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
}

impl UserSummary {
    /// Builds a summary from the stored name columns
    pub fn from_parts(id: UserId, username: String, first_name: &str, last_name: &str) -> Self {
        let full_name = display_name(&username, first_name, last_name);
        Self {
            id,
            username,
            full_name,
        }
    }
}

fn display_name(username: &str, first_name: &str, last_name: &str) -> String {
    let full = format!("{} {}", first_name, last_name);
    let full = full.trim();
    if full.is_empty() {
        username.to_string()
    } else {
        full.to_string()
    }
}

/// Data required to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub password_hash: String,
}

impl NewUser {
    /// Materializes the user with a fresh identifier and join date
    pub fn into_user(self) -> User {
        User {
            id: UserId::new_v7(),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            date_joined: Utc::now(),
        }
    }
}

/// The authenticated user on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
}

impl Actor {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::new(user.id, user.username.clone())
    }
}

/// Checks the username alphabet: letters, digits and `@.+-_`
pub fn is_valid_username(username: &str) -> bool {
    let length = username.chars().count();
    (1..=USERNAME_MAX_LENGTH).contains(&length)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
