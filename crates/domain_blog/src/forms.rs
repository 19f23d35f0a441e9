//! Form validation
//!
//! Forms arrive as raw user input. Text fields are trimmed before any rule
//! runs, so whitespace never counts towards a minimum length. Field rules are
//! declared with `validator`; rules that need more context (unknown group,
//! duplicate username) are added by the caller through [`FormErrors::add`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use core_kernel::GroupId;

use crate::user::is_valid_username;

pub const REQUIRED: &str = "This field is required.";
pub const POST_TOO_SHORT: &str = "Your post is too short";
pub const COMMENT_TOO_SHORT: &str = "Your comment is too short";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str = "Upload a valid image.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Builds errors holding a single message
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Folds another set of errors into this one
    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Ok when no error was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// Describes one input of a form for clients that render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Choice,
    Image,
    Password,
}

fn clean_text(value: &str) -> String {
    value.trim().to_string()
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Post authoring form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 3, message = "Your post is too short"))]
    pub text: String,
    pub group: Option<GroupId>,
}

impl PostForm {
    pub fn new(text: impl Into<String>, group: Option<GroupId>) -> Self {
        Self {
            text: text.into(),
            group,
        }
    }

    /// Trims the input and checks the field rules
    ///
    /// # Errors
    ///
    /// Returns the collected field errors when the text is missing or too short
    pub fn clean(self) -> Result<PostForm, FormErrors> {
        let cleaned = PostForm {
            text: clean_text(&self.text),
            group: self.group,
        };
        if cleaned.text.is_empty() {
            return Err(FormErrors::single("text", REQUIRED));
        }
        cleaned.validate()?;
        Ok(cleaned)
    }

    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec {
                name: "text",
                label: "Post text",
                help_text: "Write your post here",
                required: true,
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: "group",
                label: "Group",
                help_text: "Choose a group for the post",
                required: false,
                kind: FieldKind::Choice,
            },
            FieldSpec {
                name: "image",
                label: "Image",
                help_text: "",
                required: false,
                kind: FieldKind::Image,
            },
        ]
    }
}

/// Comment form shown under a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 3, message = "Your comment is too short"))]
    pub text: String,
}

impl CommentForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Trims the input and checks the field rules
    pub fn clean(self) -> Result<CommentForm, FormErrors> {
        let cleaned = CommentForm {
            text: clean_text(&self.text),
        };
        if cleaned.text.is_empty() {
            return Err(FormErrors::single("text", REQUIRED));
        }
        cleaned.validate()?;
        Ok(cleaned)
    }

    pub fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec {
            name: "text",
            label: "Text",
            help_text: "",
            required: true,
            kind: FieldKind::Text,
        }]
    }
}

/// Account registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 150, message = "Ensure this value has at most 150 characters."))]
    pub username: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

impl SignupForm {
    /// Trims the input and checks the field rules
    ///
    /// The password is kept verbatim.
    pub fn clean(self) -> Result<SignupForm, FormErrors> {
        let cleaned = SignupForm {
            username: clean_text(&self.username),
            password: self.password,
            first_name: clean_optional(self.first_name),
            last_name: clean_optional(self.last_name),
            email: clean_optional(self.email),
        };

        let mut errors = FormErrors::new();
        if cleaned.username.is_empty() {
            errors.add("username", REQUIRED);
        } else if !is_valid_username(&cleaned.username) {
            errors.add("username", INVALID_USERNAME);
        }
        if let Err(validation) = cleaned.validate() {
            let mut field_errors = FormErrors::from(validation);
            if errors.get("username").is_some() {
                field_errors.fields.remove("username");
            }
            errors.merge(field_errors);
        }
        errors.into_result()?;
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_text_is_trimmed_before_length_check() {
        let errors = PostForm::new("  ab  ", None).clean().unwrap_err();
        assert_eq!(errors.get("text"), Some(&[POST_TOO_SHORT.to_string()][..]));

        let form = PostForm::new("  abc ", None).clean().unwrap();
        assert_eq!(form.text, "abc");
    }

    #[test]
    fn test_blank_text_is_required() {
        let errors = CommentForm::new("   ").clean().unwrap_err();
        assert_eq!(errors.get("text"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // three Cyrillic letters are six bytes
        assert!(CommentForm::new("кот").clean().is_ok());
        assert!(CommentForm::new("ко").clean().is_err());
    }

    #[test]
    fn test_form_errors_display() {
        let mut errors = FormErrors::single("text", POST_TOO_SHORT);
        errors.add("group", INVALID_CHOICE);
        let rendered = errors.to_string();
        assert!(rendered.contains("text: Your post is too short"));
        assert!(rendered.contains("group: Select a valid choice"));
    }
}
