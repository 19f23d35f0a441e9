//! Blog domain errors
//!
//! This module defines the error types that can occur in the blog domain,
//! covering missing entities, rejected forms, and storage failures.

use core_kernel::PortError;
use thiserror::Error;

use crate::forms::FormErrors;

/// Errors that can occur in the blog domain
#[derive(Debug, Error)]
pub enum BlogError {
    /// A user, group or post referenced by the request does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        entity: &'static str,
        key: String,
    },

    /// Submitted form data failed validation
    #[error("Invalid form: {0}")]
    Form(FormErrors),

    /// A user attempted to follow themselves
    #[error("Users cannot follow themselves")]
    SelfFollow,

    /// Username/password pair did not match an account
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password hashing or verification failed
    #[error("Credential error: {0}")]
    Credentials(String),

    /// The backing store reported an error
    #[error(transparent)]
    Port(#[from] PortError),
}

impl BlogError {
    /// Creates a NotFound error for the given entity and lookup key
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        BlogError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns true if the error should surface as a missing page
    pub fn is_not_found(&self) -> bool {
        match self {
            BlogError::NotFound { .. } => true,
            BlogError::Port(err) => err.is_not_found(),
            _ => false,
        }
    }
}

impl From<FormErrors> for BlogError {
    fn from(errors: FormErrors) -> Self {
        BlogError::Form(errors)
    }
}
