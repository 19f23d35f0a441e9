//! Test Data Builders
//!
//! Builders fill every field with generated data; tests override only the
//! fields they care about.

use std::sync::atomic::{AtomicU64, Ordering};

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use domain_blog::{NewUser, SignupForm};

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A username that no other builder call has produced in this process
pub fn unique_username(prefix: &str) -> String {
    format!("{}{}", prefix, SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Text long enough to pass post and comment validation
pub fn sentence() -> String {
    Sentence(3..8).fake()
}

/// Builder for users inserted straight into a store
pub struct TestUserBuilder {
    username: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    password_hash: String,
}

impl Default for TestUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserBuilder {
    pub fn new() -> Self {
        Self {
            username: unique_username("user"),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: Some(SafeEmail().fake()),
            password_hash: String::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets a pre-computed Argon2 hash
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn build(self) -> NewUser {
        NewUser {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

/// Builder for registration forms
pub struct SignupFormBuilder {
    form: SignupForm,
}

impl Default for SignupFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupFormBuilder {
    pub fn new() -> Self {
        Self {
            form: SignupForm {
                username: unique_username("signup"),
                password: "correct-horse-battery".to_string(),
                first_name: Some(FirstName().fake()),
                last_name: Some(LastName().fake()),
                email: Some(SafeEmail().fake()),
            },
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.form.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.form.password = password.into();
        self
    }

    pub fn with_email(mut self, email: Option<&str>) -> Self {
        self.form.email = email.map(str::to_string);
        self
    }

    pub fn build(self) -> SignupForm {
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames_are_unique() {
        let a = TestUserBuilder::new().build();
        let b = TestUserBuilder::new().build();
        assert_ne!(a.username, b.username);
    }

    #[test]
    fn test_generated_signup_form_is_valid() {
        let form = SignupFormBuilder::new().build();
        assert!(form.clean().is_ok());
    }

    #[test]
    fn test_sentence_passes_post_validation() {
        let form = domain_blog::PostForm::new(sentence(), None);
        assert!(form.clean().is_ok());
    }
}
