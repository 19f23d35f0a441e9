//! Custom Test Assertions
//!
//! Assertion helpers for feeds and form errors with messages that show the
//! offending data.

use core_kernel::{Page, PostId};
use domain_blog::{BlogError, PostEntry};

/// Asserts the page is ordered newest first
pub fn assert_newest_first(page: &Page<PostEntry>) {
    for pair in page.items.windows(2) {
        assert!(
            pair[0].post.pub_date >= pair[1].post.pub_date,
            "Feed out of order: {} ({}) before {} ({})",
            pair[0].post.id,
            pair[0].post.pub_date,
            pair[1].post.id,
            pair[1].post.pub_date
        );
    }
}

/// Asserts the page holds exactly these posts in this order
pub fn assert_page_ids(page: &Page<PostEntry>, expected: &[PostId]) {
    let actual: Vec<PostId> = page.items.iter().map(|e| e.post.id).collect();
    assert_eq!(actual, expected, "Unexpected posts on page {}", page.number);
}

/// Asserts the error is a form error carrying `message` on `field`
pub fn assert_form_error(error: &BlogError, field: &str, message: &str) {
    match error {
        BlogError::Form(errors) => {
            let messages = errors.get(field).unwrap_or_default();
            assert!(
                messages.iter().any(|m| m == message),
                "Expected '{}' on field '{}', got {}",
                message,
                field,
                errors
            );
        }
        other => panic!("Expected form error, got {:?}", other),
    }
}
