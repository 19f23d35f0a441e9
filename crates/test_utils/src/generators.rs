//! Property-Based Test Generators
//!
//! Proptest strategies for blog input, split into values the forms accept
//! and values they must reject.

use proptest::prelude::*;

use core_kernel::PageRequest;

/// Usernames drawn from the allowed alphabet
pub fn username_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.@+-]{1,30}"
}

/// Post or comment text that survives trimming with at least 3 characters
pub fn valid_text_strategy() -> impl Strategy<Value = String> {
    ("[ ]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 ,.!?]{1,200}[a-zA-Z0-9.!?]", "[ ]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{}{}{}", lead, body, trail))
}

/// Text that is blank or shorter than 3 characters once trimmed
pub fn short_text_strategy() -> impl Strategy<Value = String> {
    ("[ \t]{0,4}", "[a-z]{0,2}", "[ \t]{0,4}")
        .prop_map(|(lead, body, trail)| format!("{}{}{}", lead, body, trail))
}

/// Raw `page` query values, including garbage
pub fn raw_page_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        (-5i64..50).prop_map(|n| Some(n.to_string())),
        "[a-z]{1,5}".prop_map(Some),
    ]
}

/// Parsed page requests
pub fn page_request_strategy() -> impl Strategy<Value = PageRequest> {
    raw_page_strategy().prop_map(|raw| PageRequest::parse(raw.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_blog::{CommentForm, PostForm};

    proptest! {
        #[test]
        fn valid_text_is_accepted(text in valid_text_strategy()) {
            prop_assert!(PostForm::new(text.clone(), None).clean().is_ok());
            prop_assert!(CommentForm::new(text).clean().is_ok());
        }

        #[test]
        fn short_text_is_rejected(text in short_text_strategy()) {
            prop_assert!(PostForm::new(text.clone(), None).clean().is_err());
            prop_assert!(CommentForm::new(text).clean().is_err());
        }

        #[test]
        fn generated_usernames_are_valid(name in username_strategy()) {
            prop_assert!(domain_blog::user::is_valid_username(&name));
        }
    }
}
